use crate::export::TableData;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Specifies the configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

/// A grid of text cells with an optional summary row under a second rule.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<Vec<String>>,
    pub padding: usize,
}

const CLIENT_MAX_WIDTH: usize = 32;

impl Table {
    /// Terminal view of the ledger's export table. Date and client columns
    /// read left to right; times, flags and durations are right-aligned.
    pub fn from_table_data(data: &TableData) -> Self {
        let columns = data
            .columns
            .iter()
            .enumerate()
            .map(|(idx, header)| TableColumn {
                header: header.clone(),
                max_width: (idx == 1).then_some(CLIENT_MAX_WIDTH),
                alignment: if idx < 2 {
                    Alignment::Left
                } else {
                    Alignment::Right
                },
            })
            .collect();
        Self {
            columns,
            rows: data.rows.clone(),
            footer: Some(data.summary.clone()),
            padding: 1,
        }
    }

    /// Content widths per column from headers, rows and the footer, capped
    /// by each column's `max_width`.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cells = self.rows.iter().chain(self.footer.iter());
                let width = cells
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.header.chars().count(), usize::max);
                column.max_width.map_or(width, |max| width.min(max))
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, *width, column.alignment, self.padding)
            })
            .collect();
        cells.join("│").trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let rule = horizontal_rule(&widths, self.padding);

        let mut lines = vec![self.render_row(&header, &widths), rule.clone()];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        if let Some(footer) = &self.footer {
            lines.push(rule);
            lines.push(self.render_row(footer, &widths));
        }
        lines.join("\n")
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(width - 1).collect();
    fitted.push('…');
    fitted
}

/// Renders a single cell with padding and alignment applied.
pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(fitted.chars().count());
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{}{pad}", " ".repeat(remaining)),
        Alignment::Right => format!("{pad}{}{fitted}{pad}", " ".repeat(remaining)),
    }
}

/// Builds a horizontal rule that spans the width of the table.
pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    widths
        .iter()
        .map(|width| "─".repeat(width + padding * 2))
        .collect::<Vec<_>>()
        .join("┼")
}
