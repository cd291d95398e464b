//! YAML export of the action history

use std::io::Write;

use crate::audit::HistoryFilter;
use crate::error::{FleetError, FleetResult};
use crate::export::json::HistoryExport;
use crate::storage::Storage;

/// Export history as YAML with a short header comment
pub fn export_history_yaml<W: Write>(
    storage: &Storage,
    filter: &HistoryFilter,
    writer: &mut W,
) -> FleetResult<usize> {
    let export = HistoryExport::from_storage(storage, filter)?;

    let header = format!(
        "# Fleet Manager action history\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| FleetError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, &export).map_err(|e| FleetError::Export(e.to_string()))?;

    Ok(export.record_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::create_test_storage;

    #[test]
    fn test_export_empty_history_yaml() {
        let (_temp, storage) = create_test_storage();

        let mut output = Vec::new();
        let count = export_history_yaml(&storage, &HistoryFilter::new(), &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert_eq!(count, 0);
        assert!(yaml.starts_with("# Fleet Manager action history"));
        assert!(yaml.contains("schema_version"));

        let body: String = yaml.lines().filter(|l| !l.starts_with('#')).collect::<Vec<_>>().join("\n");
        let parsed: HistoryExport = serde_yaml::from_str(&body).unwrap();
        assert!(parsed.entries.is_empty());
    }
}
