use crate::cli::commands::usage_error;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table_renderer::Table;
use crate::export::{prepare_table, SUMMARY_LABEL};
use crate::ledger::{RawEntry, Variant};

const ADD_USAGE: &str = "add <date> <client> <hours> | add <date> <client> <start> <end> [--break]";
const BREAK_FLAG: &str = "--break";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a work entry", ADD_USAGE, cmd_add),
        CommandEntry::new("undo", "Remove the most recent entry", "undo", cmd_undo),
        CommandEntry::new("list", "Show all entries with the total", "list", cmd_list),
        CommandEntry::new("total", "Show the total working time", "total", cmd_total),
        CommandEntry::new(
            "header",
            "Show, set or clear the document title",
            "header [text...] | header --clear",
            cmd_header,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let variant = context.session.ledger().variant();
    let raw = if args.is_empty() && context.mode() == CliMode::Interactive {
        prompt_entry(context, variant)?
    } else {
        entry_from_args(variant, args)?
    };

    let record = context.session.add(&raw)?;
    let cells = record.cells().join(" | ");
    io::print_success(format!("Added {cells}"));
    io::print_info(format!(
        "{SUMMARY_LABEL}: {}",
        context.session.ledger().running_total()
    ));
    Ok(())
}

fn entry_from_args(variant: Variant, args: &[&str]) -> Result<RawEntry, CommandError> {
    match (variant, args) {
        (Variant::ElapsedHours, [date, client, hours]) => Ok(RawEntry::hours(*date, *client, *hours)),
        (Variant::ShiftTimes, [date, client, start, end]) => {
            Ok(RawEntry::shift(*date, *client, *start, *end, false))
        }
        (Variant::ShiftTimes, [date, client, start, end, flag]) if *flag == BREAK_FLAG => {
            Ok(RawEntry::shift(*date, *client, *start, *end, true))
        }
        (Variant::ElapsedHours, _) => Err(usage_error("add <date> <client> <hours>")),
        (Variant::ShiftTimes, _) => Err(usage_error("add <date> <client> <start> <end> [--break]")),
    }
}

fn prompt_entry(
    context: &ShellContext,
    variant: Variant,
) -> Result<RawEntry, CommandError> {
    let date = io::prompt_text(&context.theme, "Date (DD-MM-YYYY)")?;
    let client = io::prompt_text(&context.theme, "Client / address")?;
    match variant {
        Variant::ElapsedHours => {
            let hours = io::prompt_text(&context.theme, "Hours worked")?;
            Ok(RawEntry::hours(date, client, hours))
        }
        Variant::ShiftTimes => {
            let start = io::prompt_text(&context.theme, "Start time (HH:MM)")?;
            let end = io::prompt_text(&context.theme, "End time (HH:MM)")?;
            let took_break = io::confirm_action(&context.theme, "Took a 30 minute break?", false)?;
            Ok(RawEntry::shift(date, client, start, end, took_break))
        }
    }
}

fn cmd_undo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.undo() {
        io::print_success(format!(
            "Removed the last entry. {SUMMARY_LABEL}: {}",
            context.session.total()
        ));
    } else {
        context.print_warning("Nothing to undo.");
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.session.ledger();
    let table = prepare_table(ledger);
    output_section(table.title.as_deref().unwrap_or("Entries"));
    if ledger.is_empty() {
        io::print_info("No entries recorded yet.");
    }
    plain(Table::from_table_data(&table).render());
    Ok(())
}

fn cmd_total(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.ledger().is_empty() {
        context.print_warning("No entries recorded yet.");
    }
    io::print_info(format!("{SUMMARY_LABEL}: {}", context.session.total()));
    Ok(())
}

fn cmd_header(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let header = context.session.ledger().header();
            if header.is_empty() {
                io::print_info("No title set.");
            } else {
                io::print_info(format!("Title: {header}"));
            }
        }
        [flag] if *flag == "--clear" => {
            context.session.clear_header();
            io::print_success("Title cleared.");
        }
        words => {
            let text = words.join(" ");
            context.session.set_header(text.clone());
            io::print_success(format!("Title set to `{text}`."));
        }
    }
    Ok(())
}
