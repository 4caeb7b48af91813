use crate::errors::ImportError;
use crate::models::{ExportDocument, ExportFormat};
use crate::tracker::Tracker;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

const REQUIRED_KEYS: [&str; 3] = ["subjects", "attendance", "settings"];

pub fn export_document(tracker: &Tracker, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        subjects: tracker.subjects().to_vec(),
        attendance: tracker.records().to_vec(),
        settings: tracker.settings().clone(),
        export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

pub fn export_filename(date: NaiveDate, format: ExportFormat) -> String {
    format!("attendance_backup_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

pub fn render_document(document: &ExportDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Parses a backup file. The three collections must all be present before
/// the document is trusted as typed data; nothing is merged partially.
pub fn import_document(text: &str) -> Result<ExportDocument, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;

    let Some(object) = value.as_object() else {
        return Err(ImportError::Schema("expected a JSON object".to_string()));
    };

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| object.get(*key).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::Schema(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    serde_json::from_value(value).map_err(|err| ImportError::Schema(err.to_string()))
}
