//! Export pipeline: canvas snapshot → id passes → canonical JSON.
//!
//! Combines the transform passes and the emitter into a single entry point
//! used by the designer's save/preview actions and the WASM bridge.

use crate::emitter::emit_records;
use crate::error::FormError;
use crate::model::Task;
use crate::pages::MultiPageDocument;
use crate::parser::parse_document;
use crate::record::SchemaEntry;
use crate::transform::{apply_duplicate_policy, apply_duplicate_policy_multipage, resolve_ids};
use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

/// What to do when two exported fields end up with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateIdPolicy {
    /// Export as-is, logging a warning.
    Keep,
    /// Fail the export with `FormError::DuplicateId`.
    Reject,
    /// Rename repeats to `{id}2`, `{id}3`, …
    #[default]
    AutoSuffix,
}

/// Configuration for `export_document`.
///
/// Deserializable with every field optional, so hosts can pass a partial
/// JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Duplicate id handling. Default: **AutoSuffix**.
    pub duplicate_ids: DuplicateIdPolicy,

    /// Write label-derived ids back before the duplicate check, so that two
    /// fields labelled "Email" become `idEmail` and `idEmail2`. Default: **true**.
    pub resolve_ids: bool,

    /// Pretty-print the JSON output. Default: **true**.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            duplicate_ids: DuplicateIdPolicy::default(),
            resolve_ids: true,
            pretty: true,
        }
    }
}

// ─── Pipeline ─────────────────────────────────────────────────────────────

/// Canonical records for the canvas partition of `tasks`, after the
/// configured id passes. The input is not modified.
///
/// # Errors
/// `FormError::DuplicateId` when the policy is `Reject` and ids collide.
pub fn export_records(tasks: &[Task], config: &ExportConfig) -> Result<Vec<SchemaEntry>, FormError> {
    let mut snapshot: Vec<Task> = tasks.iter().filter(|t| t.is_canvas()).cloned().collect();

    if config.resolve_ids {
        resolve_ids(&mut snapshot);
    }
    apply_duplicate_policy(&mut snapshot, config.duplicate_ids)?;

    Ok(emit_records(&snapshot))
}

/// Serialize the canvas to canonical single-page JSON.
///
/// # Errors
/// `FormError::DuplicateId` when the policy is `Reject` and ids collide.
pub fn export_document(tasks: &[Task], config: &ExportConfig) -> Result<String, FormError> {
    let records = export_records(tasks, config)?;
    to_json(&records, config.pretty)
}

/// Serialize a multi-page document to canonical JSON.
///
/// # Errors
/// `FormError::DuplicateId` when the policy is `Reject` and ids collide.
pub fn export_multipage(doc: &MultiPageDocument, config: &ExportConfig) -> Result<String, FormError> {
    let mut snapshot = doc.clone();
    apply_duplicate_policy_multipage(&mut snapshot, config.duplicate_ids)?;
    snapshot.to_json(config.pretty)
}

/// Parse a canonical document and re-export it: unknown records dropped,
/// defaults filled, ids resolved.
///
/// The output is idempotent: `normalize_document(normalize_document(s, c), c) == normalize_document(s, c)`.
///
/// # Errors
/// Parse errors, and `FormError::DuplicateId` under the `Reject` policy.
pub fn normalize_document(input: &str, config: &ExportConfig) -> Result<String, FormError> {
    let tasks = parse_document(input)?;
    export_document(&tasks, config)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, FormError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, FieldType};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn config_defaults_from_partial_json() {
        let config: ExportConfig = serde_json::from_str(r#"{"pretty": false}"#).unwrap();
        assert_eq!(
            config,
            ExportConfig {
                pretty: false,
                ..ExportConfig::default()
            }
        );
        let config: ExportConfig = serde_json::from_str(r#"{"duplicateIds": "reject"}"#).unwrap();
        assert_eq!(config.duplicate_ids, DuplicateIdPolicy::Reject);
        assert!(config.resolve_ids);
    }

    #[test]
    fn two_email_fields_export_distinct_ids() {
        let tasks = vec![
            Task::labeled("", "Email", FieldKind::empty(FieldType::TextInput)),
            Task::labeled("", "Email", FieldKind::empty(FieldType::TextInput)),
        ];
        let records = export_records(&tasks, &ExportConfig::default()).unwrap();
        let ids: Vec<&str> = records.iter().map(SchemaEntry::id).collect();
        assert_eq!(ids, vec!["idEmail", "idEmail2"]);
    }

    #[test]
    fn reject_policy_fails_the_export() {
        let tasks = vec![
            Task::labeled("", "Email", FieldKind::empty(FieldType::TextInput)),
            Task::labeled("idEmail", "Work", FieldKind::empty(FieldType::TextInput)),
        ];
        let config = ExportConfig {
            duplicate_ids: DuplicateIdPolicy::Reject,
            ..ExportConfig::default()
        };
        assert!(matches!(
            export_document(&tasks, &config),
            Err(FormError::DuplicateId(_))
        ));
    }

    #[test]
    fn export_leaves_the_model_untouched() {
        let tasks = vec![Task::labeled("", "Email", FieldKind::empty(FieldType::TextInput))];
        export_document(&tasks, &ExportConfig::default()).unwrap();
        assert!(tasks[0].id.is_blank());
    }

    #[test]
    fn normalize_is_idempotent() {
        let input = r#"[
            {"type": "FormElement", "id": "f", "formName": "Contact"},
            {"type": "Slider", "label": "Level", "id": "s1"},
            {"type": "Mystery", "id": "m"},
            {"type": "Checkbox", "label": "Subscribe to Newsletter!"}
        ]"#;
        let config = ExportConfig::default();
        let once = normalize_document(input, &config).unwrap();
        let twice = normalize_document(&once, &config).unwrap();
        assert_eq!(once, twice);

        let value: Value = serde_json::from_str(&once).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(
            value[1],
            json!({"type": "Slider", "id": "s1", "label": "Level", "min": 0, "max": 10, "step": 1, "defaultValue": 5})
        );
    }

    #[test]
    fn compact_output() {
        let tasks = vec![Task::labeled("n", "Name", FieldKind::empty(FieldType::TextInput))];
        let config = ExportConfig {
            pretty: false,
            ..ExportConfig::default()
        };
        assert_eq!(
            export_document(&tasks, &config).unwrap(),
            r#"[{"type":"TextInput","id":"n","label":"Name","icon":""}]"#
        );
    }
}
