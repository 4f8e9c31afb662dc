use crate::ledger::{Ledger, Total};

pub const SUMMARY_LABEL: &str = "Sum Timer";

/// The ledger flattened into printable cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub summary: Vec<String>,
    pub total: Total,
}

impl TableData {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Builds the header row, one row per record in insertion order, and the
/// summary row holding the recomputed total in the last column.
pub fn prepare_table(ledger: &Ledger) -> TableData {
    let columns: Vec<String> = ledger
        .variant()
        .columns()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let rows = ledger.records().iter().map(|record| record.cells()).collect();
    let total = ledger.total_duration();

    let mut summary = vec![String::new(); columns.len()];
    summary[0] = SUMMARY_LABEL.to_string();
    if let Some(last) = summary.last_mut() {
        *last = total.to_string();
    }

    let header = ledger.header().trim();
    TableData {
        title: (!header.is_empty()).then(|| header.to_string()),
        columns,
        rows,
        summary,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Record, Variant};

    #[test]
    fn summary_row_puts_total_in_last_column() {
        let mut ledger = Ledger::new(Variant::ShiftTimes);
        ledger
            .add_record(Record::shift("01-04-2024", "Kaia", "08:00", "09:30", false).unwrap())
            .unwrap();
        let table = prepare_table(&ledger);
        assert_eq!(table.summary, vec!["Sum Timer", "", "", "", "", "1:30"]);
        assert_eq!(table.title, None);
    }

    #[test]
    fn whitespace_header_has_no_title() {
        let mut ledger = Ledger::new(Variant::ElapsedHours);
        ledger.set_header("   ");
        assert_eq!(prepare_table(&ledger).title, None);
    }
}
