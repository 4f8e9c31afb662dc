//! The operations a form front end calls into: add, undo, totals, export
//! and convert. Every failure comes back as a [`WorklogError`] value.

use std::path::Path;

use crate::{
    config::Config,
    errors::{ConfigError, LedgerError, WorklogError},
    export::{DocumentExporter, ExportSummary},
    ledger::{Ledger, RawEntry, Record, Total},
    raster::{ConversionReport, RasterConverter},
};

#[derive(Debug, Clone)]
pub struct Session {
    ledger: Ledger,
    exporter: DocumentExporter,
    converter: RasterConverter,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            ledger: Ledger::new(config.variant).with_undo_policy(config.undo_policy),
            exporter: DocumentExporter::new(),
            converter: RasterConverter::new(config.raster_options()),
        }
    }

    /// Applies changed settings. The record shape can only change while the
    /// ledger is empty.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), WorklogError> {
        if config.variant != self.ledger.variant() {
            if !self.ledger.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "cannot switch to `{}` while the ledger holds {} record(s)",
                    config.variant,
                    self.ledger.len()
                ))
                .into());
            }
            let header = self.ledger.header().to_string();
            self.ledger = Ledger::new(config.variant);
            self.ledger.set_header(header);
        }
        self.ledger.set_undo_policy(config.undo_policy);
        self.converter = RasterConverter::new(config.raster_options());
        Ok(())
    }

    pub fn add(&mut self, raw: &RawEntry) -> Result<&Record, WorklogError> {
        self.ledger.add_entry(raw).map_err(|err| match err {
            LedgerError::Format(err) => WorklogError::Format(err),
            other => WorklogError::Ledger(other),
        })
    }

    pub fn undo(&mut self) -> bool {
        self.ledger.undo()
    }

    pub fn total(&self) -> Total {
        self.ledger.total_duration()
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.ledger.set_header(header);
    }

    pub fn clear_header(&mut self) {
        self.ledger.clear_header();
    }

    pub fn export(&self, path: &Path) -> Result<ExportSummary, WorklogError> {
        Ok(self.exporter.export(&self.ledger, path)?)
    }

    pub fn convert(&self, source: &Path, output_dir: &Path) -> Result<ConversionReport, WorklogError> {
        Ok(self.converter.convert(source, output_dir)?)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Whether closing the session would discard records.
    pub fn has_unsaved_records(&self) -> bool {
        !self.ledger.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{UndoPolicy, Variant};

    #[test]
    fn variant_switch_requires_empty_ledger() {
        let mut session = Session::default();
        session
            .add(&RawEntry::hours("01-01-2024", "Acme", "2"))
            .unwrap();

        let mut config = Config {
            variant: Variant::ShiftTimes,
            ..Config::default()
        };
        assert!(matches!(
            session.apply_config(&config),
            Err(WorklogError::Config(ConfigError::Invalid(_)))
        ));
        assert_eq!(session.ledger().variant(), Variant::ElapsedHours);

        session.undo();
        session.set_header("Kari");
        session.apply_config(&config).unwrap();
        assert_eq!(session.ledger().variant(), Variant::ShiftTimes);
        assert_eq!(session.ledger().header(), "Kari");

        config.undo_policy = UndoPolicy::KeepFirstEntry;
        session.apply_config(&config).unwrap();
        assert_eq!(session.ledger().undo_policy(), UndoPolicy::KeepFirstEntry);
    }

    #[test]
    fn format_errors_surface_as_values() {
        let mut session = Session::default();
        let err = session
            .add(&RawEntry::hours("32-01-2024", "Acme", "2"))
            .unwrap_err();
        assert!(matches!(err, WorklogError::Format(_)));
        assert!(err.to_string().contains("DD-MM-YYYY"));
        assert!(!session.has_unsaved_records());
    }
}
