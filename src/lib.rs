#![doc(test(attr(deny(warnings))))]

//! Worklog Core records timesheet lines in an undoable in-memory ledger,
//! exports them as a paginated PDF table, and rasterizes PDF pages to JPEG.

pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod raster;
pub mod session;
pub mod utils;

use std::sync::Once;

pub use session::Session;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Worklog Core tracing initialized.");
    });
}
