//! CSV interchange: the one wire format of the contact store.
//!
//! Two dialects are supported. `Legacy` is the historical format: naive
//! comma splitting on import and `\,` escaping on export. The importer does
//! not undo that escaping, so a value containing a comma does not survive an
//! export/import round trip. `Rfc4180` is standard quoted CSV and is
//! symmetric; choosing it changes the file format.

pub mod export_csv;
pub mod import_csv;

use crate::prelude::AppError;
use serde::Serialize;

pub use export_csv::{EXPORT_HEADER, export_contacts};
pub use import_csv::parse_rows;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvDialect {
    #[default]
    Legacy,
    Rfc4180,
}

impl CsvDialect {
    pub fn from(str: &str) -> Result<Self, AppError> {
        match str.trim().to_lowercase().as_str() {
            "legacy" => Ok(CsvDialect::Legacy),
            "rfc4180" | "quoted" => Ok(CsvDialect::Rfc4180),
            _ => Err(AppError::Validation(format!(
                "Not a recognized CSV dialect: '{}'",
                str
            ))),
        }
    }
}

/// Outcome of an import: rows created and rows rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}
