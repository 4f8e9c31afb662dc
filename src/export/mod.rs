//! Ledger to paginated PDF export.

pub mod layout;
pub mod pdf;
pub mod table;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{errors::ExportError, ledger::Ledger, ledger::Total};

pub use layout::{layout, DocumentLayout, PageLayout, PageSize, RowKind, Shape};
pub use table::{prepare_table, TableData, SUMMARY_LABEL};

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub rows: usize,
    pub total: Total,
}

/// Renders a ledger into a styled table document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter {
    page_size: PageSize,
}

impl DocumentExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: PageSize) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Computes the page layout without touching the filesystem.
    pub fn layout(&self, ledger: &Ledger) -> DocumentLayout {
        layout(&prepare_table(ledger), self.page_size)
    }

    pub fn export(&self, ledger: &Ledger, path: &Path) -> Result<ExportSummary, ExportError> {
        let table = prepare_table(ledger);
        let document_layout = layout(&table, self.page_size);
        let mut document = pdf::build_document(&document_layout)?;
        pdf::write_document(&mut document, path)?;

        let summary = ExportSummary {
            path: path.to_path_buf(),
            pages: document_layout.pages.len(),
            rows: table.rows.len(),
            total: table.total,
        };
        info!(
            path = %path.display(),
            pages = summary.pages,
            rows = summary.rows,
            total = %summary.total,
            "ledger exported"
        );
        Ok(summary)
    }
}
