use crate::cli::commands::usage_error;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;
use crate::utils::build_info;

const CONFIG_USAGE: &str = "config [show] | config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("config", "Show or change settings", CONFIG_USAGE, cmd_config),
        CommandEntry::new("info", "Show the ledger state", "info", cmd_info),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output_section("Settings");
            for (key, value) in context.config().entries() {
                io::print_info(format!("  {key:<13}: {value}"));
            }
            io::print_info(format!("  Stored in    : {}", context.config_path().display()));
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let value = value.join(" ");
            context.update_config(key, &value)?;
            io::print_success(format!("Set {key} = {value}."));
            Ok(())
        }
        ["set", ..] => Err(CommandError::InvalidArguments(format!(
            "usage: config set <key> <value> (keys: {})",
            CONFIG_KEYS.join(", ")
        ))),
        _ => Err(usage_error(CONFIG_USAGE)),
    }
}

fn cmd_info(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.session.ledger();
    output_section("Ledger");
    let header = match ledger.header() {
        "" => "-",
        text => text,
    };
    let rows = [
        ("Record shape", ledger.variant().to_string()),
        ("Entries", ledger.len().to_string()),
        ("Snapshots", ledger.history_len().to_string()),
        ("Undo policy", ledger.undo_policy().to_string()),
        ("Undo possible", yes_no(ledger.can_undo()).to_string()),
        ("Title", header.to_string()),
        ("Total", ledger.total_duration().to_string()),
    ];
    for (label, value) in rows {
        io::print_info(format!("  {label:<13}: {value}"));
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Worklog Core {}", meta.version));
    for (label, value) in meta.rows() {
        io::print_info(format!("  {label:<13}: {value}"));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let variant = context.session.ledger().variant();
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command, variant);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry, variant);
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.confirm_exit()? {
        Err(CommandError::ExitRequested)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use tempfile::tempdir;

    #[test]
    fn config_set_rejects_unknown_keys() {
        let temp = tempdir().unwrap();
        let mut app = process_script(temp.path(), &[]).unwrap();
        assert!(app.process_line("config set colour blue").is_err());
        assert!(app.process_line("config set jpeg_quality").is_err());
        assert!(app.process_line("config set jpeg_quality 80").is_ok());
        assert_eq!(app.config().jpeg_quality, 80);
    }

    #[test]
    fn informational_commands_succeed() {
        let temp = tempdir().unwrap();
        let mut app = process_script(temp.path(), &[]).unwrap();
        for line in ["info", "version", "help", "help add", "help nope", "config"] {
            assert!(app.process_line(line).is_ok(), "{line} failed");
        }
    }
}
