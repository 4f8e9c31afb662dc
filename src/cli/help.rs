use crate::cli::output::{plain, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::ledger::{time_parser::BREAK_MINUTES, Variant};

pub fn print_overview(registry: &CommandRegistry, variant: Variant) {
    output_section("Commands");
    overview_lines(registry).iter().for_each(plain);
    output_section(format!("Entries ({variant})"));
    entry_notes(variant).iter().for_each(plain);
    plain("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry, variant: Variant) {
    output_section(format!("Help: {}", entry.name));
    plain(format!("  {}", entry.description));
    plain(format!("  usage: {}", entry.usage));
    if entry.name == "add" {
        entry_notes(variant).iter().for_each(plain);
    }
}

/// One description line and one usage line per command, in registration order.
fn overview_lines(registry: &CommandRegistry) -> Vec<String> {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    registry
        .list()
        .into_iter()
        .flat_map(|entry| {
            [
                format!("  {:<width$}  {}", entry.name, entry.description),
                format!("  {:<width$}    {}", "", entry.usage),
            ]
        })
        .collect()
}

fn entry_notes(variant: Variant) -> Vec<String> {
    let mut notes = vec!["  Dates are DD-MM-YYYY. Quote client names that contain spaces.".to_string()];
    match variant {
        Variant::ElapsedHours => {
            notes.push("  Hours are a decimal number, e.g. 7.5. Totals show two decimals.".into());
        }
        Variant::ShiftTimes => {
            notes.push("  Start and end are HH:MM or H:MM on the same day.".into());
            notes.push(format!(
                "  --break subtracts {BREAK_MINUTES} minutes. Totals show H:MM."
            ));
        }
    }
    notes.push("  Switch the record shape with `config set variant` while the ledger is empty.".into());
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::register_all;

    #[test]
    fn overview_pairs_each_command_with_its_usage() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let lines = overview_lines(&registry);

        assert_eq!(lines.len(), registry.list().len() * 2);
        assert!(lines[0].trim_start().starts_with("add"));
        assert!(lines[1].contains("add <date> <client> <hours>"));
        assert!(lines.iter().any(|line| line.contains("convert <file.pdf> <output-dir>")));
    }

    #[test]
    fn entry_notes_follow_the_record_shape() {
        let hours = entry_notes(Variant::ElapsedHours).join("\n");
        assert!(hours.contains("decimal number"));
        assert!(!hours.contains("--break"));

        let shifts = entry_notes(Variant::ShiftTimes).join("\n");
        assert!(shifts.contains("--break subtracts 30 minutes"));
    }
}
