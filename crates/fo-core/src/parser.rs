//! Parser: canonical single-page form JSON → canvas tasks.
//!
//! Lenient by design of the wire format: unknown or malformed records are
//! dropped with a warning, missing or mistyped attributes take the type's
//! defaults. Only a document that is not a JSON array is an error.

use crate::error::FormError;
use crate::id::TaskId;
use crate::model::*;
use serde_json::{Map, Value};

/// Parse a canonical form document into canvas tasks.
///
/// # Errors
/// `FormError::Json` when the input is not valid JSON, and
/// `FormError::NotAnArray` when the top level is not an array.
pub fn parse_document(input: &str) -> Result<Vec<Task>, FormError> {
    let value: Value = serde_json::from_str(input)?;
    parse_value(&value)
}

/// Like [`parse_document`], for an already decoded JSON value.
///
/// # Errors
/// `FormError::NotAnArray` when `value` is not an array.
pub fn parse_value(value: &Value) -> Result<Vec<Task>, FormError> {
    let Value::Array(records) = value else {
        return Err(FormError::NotAnArray);
    };
    Ok(parse_records(records))
}

/// Map every recognized record to a canvas task, in input order.
#[must_use]
pub fn parse_records(records: &[Value]) -> Vec<Task> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let task = parse_record(record);
            if task.is_none() {
                log::warn!("dropping record #{index}: {}", describe(record));
            }
            task
        })
        .collect()
}

/// Map a single record to a canvas task, or `None` if it cannot be placed on
/// a single-page canvas.
#[must_use]
pub fn parse_record(record: &Value) -> Option<Task> {
    let fields = RecordFields::of(record)?;
    let ty = FieldType::parse(fields.text("type").as_str())?;

    let kind = match ty {
        FieldType::FormElement => FieldKind::FormElement(FormMeta {
            form_name: fields.text_or("formName", "Untitled Form"),
            form_subtitle: fields.text("formSubtitle"),
            form_style: fields.text_or("formStyle", "A"),
            form_icon: fields.text("formIcon"),
            form_identifier: fields
                .non_empty("formIdentifier")
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        }),
        FieldType::TextInput => FieldKind::TextInput {
            icon: fields.text("icon"),
        },
        FieldType::TextArea => FieldKind::TextArea {
            icon: fields.text("icon"),
            required: fields.flag("required"),
        },
        FieldType::Checkbox => FieldKind::Checkbox {
            checked_value: fields.text("checkedValue"),
            unchecked_value: fields.text("uncheckedValue"),
        },
        FieldType::Toggle => FieldKind::Toggle {
            toggle_on: fields.text("toggleOn"),
            toggle_off: fields.text("toggleOff"),
        },
        FieldType::DropDown => FieldKind::DropDown {
            options: fields.options("options"),
        },
        FieldType::Radio => FieldKind::Radio {
            options: fields.options("options"),
        },
        FieldType::Slider => FieldKind::Slider(fields.range()),
        FieldType::NumberSpinner => FieldKind::NumberSpinner(fields.range()),
        FieldType::DigitalSignature => FieldKind::DigitalSignature {
            required: fields.flag("required"),
            signer_name: fields.text("signerName"),
            signature_url: fields.text("signatureUrl"),
        },
        FieldType::StarRating => FieldKind::StarRating {
            max_stars: fields.count("maxStars"),
        },
        FieldType::DatePicker => FieldKind::DatePicker {
            icon: fields.text("icon"),
            required: fields.flag("required"),
            default_value: fields.text("defaultValue"),
        },
        FieldType::Page | FieldType::Question => return None,
    };

    Some(Task {
        id: fields.id(),
        status: Status::Canvas,
        label: fields.text("label"),
        text: String::new(),
        kind: kind.with_defaults(),
    })
}

fn describe(record: &Value) -> String {
    match record.get("type").and_then(Value::as_str) {
        Some(ty) => format!("unsupported type '{ty}'"),
        None => "missing type".to_string(),
    }
}

// ─── Lenient field access ────────────────────────────────────────────────

/// Read-only view over one JSON object, with the defaulting rules of the
/// wire format: wrong JSON types read as absent.
pub(crate) struct RecordFields<'a>(&'a Map<String, Value>);

impl<'a> RecordFields<'a> {
    pub(crate) fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(RecordFields)
    }

    fn raw_str(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// String attribute, or empty.
    pub(crate) fn text(&self, key: &str) -> String {
        self.raw_str(key).unwrap_or_default().to_string()
    }

    /// String attribute, or `default` when absent or empty.
    pub(crate) fn text_or(&self, key: &str, default: &str) -> String {
        self.non_empty(key).unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn non_empty(&self, key: &str) -> Option<String> {
        self.raw_str(key)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// The record's id, or a fresh one when missing or blank.
    pub(crate) fn id(&self) -> TaskId {
        match self.raw_str("id").map(str::trim) {
            Some(id) if !id.is_empty() => TaskId::intern(id),
            _ => TaskId::fresh(),
        }
    }

    pub(crate) fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// A finite number, or `None`.
    pub(crate) fn number(&self, key: &str) -> Option<f64> {
        self.0
            .get(key)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
    }

    /// A non-negative integral count, or `None`.
    pub(crate) fn count(&self, key: &str) -> Option<u32> {
        self.number(key)
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
    }

    /// String list; non-string entries are skipped.
    pub(crate) fn options(&self, key: &str) -> Options {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn array(&self, key: &str) -> &'a [Value] {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    fn range(&self) -> NumericRange {
        NumericRange {
            min: self.number("min"),
            max: self.number("max"),
            step: self.number("step"),
            default_value: self.number("defaultValue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn one(record: Value) -> Task {
        parse_record(&record).expect("record should parse")
    }

    #[test]
    fn slider_missing_numbers_take_slider_defaults() {
        let task = one(json!({"type": "Slider", "id": "s1", "label": "Level"}));
        assert_eq!(task.id.as_str(), "s1");
        assert_eq!(task.label, "Level");
        assert_eq!(task.status, Status::Canvas);
        assert_eq!(
            task.kind,
            FieldKind::Slider(NumericRange::new(0.0, 10.0, 1.0, 5.0))
        );
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let task = one(json!({"type": "NumberSpinner", "min": "low", "max": 50, "step": null}));
        assert_eq!(
            task.kind,
            FieldKind::NumberSpinner(NumericRange::new(0.0, 50.0, 1.0, 0.0))
        );
    }

    #[test]
    fn missing_id_gets_fresh_uuid() {
        let a = one(json!({"type": "TextInput", "label": "Name"}));
        let b = one(json!({"type": "TextInput", "label": "Name", "id": "  "}));
        assert_eq!(a.id.as_str().len(), 36);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn form_element_defaults() {
        let task = one(json!({"type": "FormElement", "id": "f"}));
        let FieldKind::FormElement(meta) = task.kind else {
            panic!("expected a form element");
        };
        assert_eq!(meta.form_name, "Untitled Form");
        assert_eq!(meta.form_style, "A");
        assert_eq!(meta.form_subtitle, "");
        assert_eq!(meta.form_identifier.len(), 36);
    }

    #[test]
    fn toggle_and_checkbox_share_serializer_defaults() {
        let toggle = one(json!({"type": "Toggle"}));
        assert_eq!(
            toggle.kind,
            FieldKind::Toggle {
                toggle_on: "Yes".into(),
                toggle_off: "No".into()
            }
        );
        let checkbox = one(json!({"type": "Checkbox", "checkedValue": "Y"}));
        assert_eq!(
            checkbox.kind,
            FieldKind::Checkbox {
                checked_value: "Y".into(),
                unchecked_value: "Unchecked".into()
            }
        );
    }

    #[test]
    fn radio_and_date_picker_are_recognized() {
        let radio = one(json!({"type": "Radio", "id": "r", "options": ["a", 1, "b"]}));
        assert_eq!(
            radio.kind,
            FieldKind::Radio {
                options: Options::from_vec(vec!["a".into(), "b".into()])
            }
        );
        let date = one(json!({"type": "DatePicker", "defaultValue": "2024-01-01"}));
        assert_eq!(
            date.kind,
            FieldKind::DatePicker {
                icon: DEFAULT_DATE_ICON.into(),
                required: false,
                default_value: "2024-01-01".into()
            }
        );
    }

    #[test]
    fn star_rating_count_must_be_integral() {
        let task = one(json!({"type": "StarRating", "maxStars": 2.5}));
        assert_eq!(task.kind, FieldKind::StarRating { max_stars: Some(5) });
        let task = one(json!({"type": "StarRating", "maxStars": 10}));
        assert_eq!(task.kind, FieldKind::StarRating { max_stars: Some(10) });
    }

    #[test]
    fn unknown_and_structural_records_are_dropped() {
        let tasks = parse_records(&[
            json!({"type": "Hologram", "id": "h"}),
            json!({"type": "Page", "id": "p"}),
            json!("not an object"),
            json!({"id": "no-type"}),
            json!({"type": "TextInput", "id": "keep"}),
        ]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "keep");
    }

    #[test]
    fn top_level_must_be_an_array() {
        assert!(matches!(
            parse_document(r#"{"type": "TextInput"}"#),
            Err(FormError::NotAnArray)
        ));
        assert!(matches!(parse_document("[1,"), Err(FormError::Json(_))));
        assert_eq!(parse_document("[]").unwrap(), Vec::new());
    }
}
