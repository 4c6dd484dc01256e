use crate::db::store::AlarmStore;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::AlarmExport;
use crate::models::alarm::CategoryKind;
use crate::models::locale::Locale;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export alarm definitions of the selected categories.
    pub fn export(
        store: &mut AlarmStore,
        format: ExportFormat,
        file: &str,
        kinds: &[CategoryKind],
        locale: Locale,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        let mut rows = Vec::new();
        for kind in kinds {
            for record in store.list(*kind)? {
                let state = store.state(record.id)?.unwrap_or_default();
                rows.push(AlarmExport::from_record(&record, state, locale));
            }
        }

        if rows.is_empty() {
            warning("No alarms to export.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}
