//! Export of the action history
//!
//! - CSV: one row per record, changes as compact JSON (spreadsheet-friendly)
//! - JSON: versioned document of listing entries
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_history_csv;
pub use json::{export_history_json, HistoryExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_history_yaml;
