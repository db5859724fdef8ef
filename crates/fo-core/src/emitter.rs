//! Emitter: canvas tasks → canonical single-page form JSON.
//!
//! Pure functions of their input. Only canvas tasks are emitted; palette
//! templates never reach the export.

use crate::error::FormError;
use crate::model::*;
use crate::record::{FieldRecord, SchemaEntry};

/// Emit the canvas partition of `tasks` as canonical records, in order.
#[must_use]
pub fn emit_records(tasks: &[Task]) -> Vec<SchemaEntry> {
    tasks
        .iter()
        .filter(|t| t.is_canvas())
        .map(emit_record)
        .collect()
}

/// Emit the canvas partition of `tasks` as pretty-printed JSON.
///
/// # Errors
/// Only fails if `serde_json` cannot serialize the records, which would be
/// a bug in the record types.
pub fn emit_json(tasks: &[Task]) -> Result<String, FormError> {
    Ok(serde_json::to_string_pretty(&emit_records(tasks))?)
}

/// Project a single task onto its canonical record.
#[must_use]
pub fn emit_record(task: &Task) -> SchemaEntry {
    let ty = task.field_type();
    let id = task.resolved_id();
    let label = match task.display_label() {
        "" => ty.default_label().to_string(),
        l => l.to_string(),
    };

    let record = match task.kind.clone().with_defaults() {
        FieldKind::FormElement(meta) => FieldRecord::FormElement {
            id,
            form_icon: meta.form_icon,
            form_subtitle: meta.form_subtitle,
            form_name: meta.form_name,
            form_identifier: meta.form_identifier,
            form_style: meta.form_style,
        },
        FieldKind::TextInput { icon } => FieldRecord::TextInput { id, label, icon },
        FieldKind::TextArea { icon, required } => FieldRecord::TextArea {
            id,
            label,
            required,
            icon,
        },
        FieldKind::Checkbox {
            checked_value,
            unchecked_value,
        } => FieldRecord::Checkbox {
            id,
            label,
            checked_value,
            unchecked_value,
        },
        FieldKind::Toggle {
            toggle_on,
            toggle_off,
        } => FieldRecord::Toggle {
            id,
            label,
            toggle_on,
            toggle_off,
        },
        FieldKind::DropDown { options } => FieldRecord::DropDown {
            id,
            label,
            options: options.into_vec(),
        },
        FieldKind::Radio { options } => FieldRecord::Radio {
            id,
            label,
            options: options.into_vec(),
        },
        FieldKind::Slider(range) => {
            let r = range.resolve(SLIDER_DEFAULTS);
            FieldRecord::Slider {
                id,
                label,
                min: r.min,
                max: r.max,
                step: r.step,
                default_value: r.default_value,
            }
        }
        FieldKind::NumberSpinner(range) => {
            let r = range.resolve(SPINNER_DEFAULTS);
            FieldRecord::NumberSpinner {
                id,
                label,
                min: r.min,
                max: r.max,
                step: r.step,
                default_value: r.default_value,
            }
        }
        FieldKind::DigitalSignature {
            required,
            signer_name,
            signature_url,
        } => FieldRecord::DigitalSignature {
            id,
            label,
            required,
            signer_name,
            signature_url,
        },
        FieldKind::StarRating { max_stars } => FieldRecord::StarRating {
            id,
            label,
            max_stars: max_stars.unwrap_or(DEFAULT_MAX_STARS),
        },
        FieldKind::DatePicker {
            icon,
            required,
            default_value,
        } => FieldRecord::DatePicker {
            id,
            label,
            icon,
            required,
            default_value,
        },
        FieldKind::Page { .. } | FieldKind::Question { .. } => {
            return SchemaEntry::Opaque {
                type_name: ty.as_str().to_string(),
                id,
            };
        }
    };
    SchemaEntry::Field(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn to_value(task: &Task) -> serde_json::Value {
        serde_json::to_value(emit_record(task)).unwrap()
    }

    #[test]
    fn text_input_derives_id_from_label() {
        let task = Task::labeled("", "Email Address", FieldKind::empty(FieldType::TextInput));
        assert_eq!(
            to_value(&task),
            json!({"type": "TextInput", "id": "idEmailAddress", "label": "Email Address", "icon": ""})
        );
    }

    #[test]
    fn each_type_uses_its_own_prefix() {
        let cases = [
            (FieldType::TextArea, "textareaBio"),
            (FieldType::Checkbox, "checkboxBio"),
            (FieldType::Toggle, "toggleBio"),
            (FieldType::DropDown, "dropdownBio"),
            (FieldType::Slider, "sliderBio"),
            (FieldType::NumberSpinner, "spinnerBio"),
            (FieldType::DigitalSignature, "signatureBio"),
            (FieldType::StarRating, "ratingBio"),
            (FieldType::DatePicker, "dateBio"),
        ];
        for (ty, expected) in cases {
            let task = Task::labeled(" ", "Bio", FieldKind::empty(ty));
            assert_eq!(emit_record(&task).id(), expected, "{ty:?}");
        }
    }

    #[test]
    fn radio_and_form_element_keep_their_id() {
        let radio = Task::labeled("", "Pick", FieldKind::empty(FieldType::Radio));
        assert_eq!(emit_record(&radio).id(), "");
        let mut form = Task::form_element();
        form.id = TaskId::intern("f1");
        assert_eq!(emit_record(&form).id(), "f1");
    }

    #[test]
    fn label_falls_back_to_text() {
        let mut task = Task::new(TaskId::default(), FieldKind::empty(FieldType::Checkbox));
        task.text = "Subscribe".into();
        assert_eq!(
            to_value(&task),
            json!({
                "type": "Checkbox",
                "id": "checkboxSubscribe",
                "label": "Subscribe",
                "checkedValue": "Checked",
                "uncheckedValue": "Unchecked",
            })
        );
    }

    #[test]
    fn numeric_defaults_per_type() {
        let slider = Task::labeled("s", "", FieldKind::empty(FieldType::Slider));
        assert_eq!(
            to_value(&slider),
            json!({"type": "Slider", "id": "s", "label": "Slider", "min": 0, "max": 10, "step": 1, "defaultValue": 5})
        );
        let spinner = Task::labeled("n", "Qty", FieldKind::empty(FieldType::NumberSpinner));
        assert_eq!(
            to_value(&spinner),
            json!({"type": "NumberSpinner", "id": "n", "label": "Qty", "min": 0, "max": 100, "step": 1, "defaultValue": 0})
        );
        let rating = Task::labeled("r", "", FieldKind::empty(FieldType::StarRating));
        assert_eq!(
            to_value(&rating),
            json!({"type": "StarRating", "id": "r", "label": "Rating", "maxStars": 5})
        );
    }

    #[test]
    fn date_picker_defaults() {
        let date = Task::labeled("", "", FieldKind::empty(FieldType::DatePicker));
        assert_eq!(
            to_value(&date),
            json!({
                "type": "DatePicker",
                "id": "dateUnknown",
                "label": "Select Date",
                "icon": "📅",
                "required": false,
                "defaultValue": "",
            })
        );
    }

    #[test]
    fn structural_tasks_fall_back_to_type_and_id() {
        let page = Task::labeled("p1", "", FieldKind::empty(FieldType::Page));
        assert_eq!(to_value(&page), json!({"type": "Page", "id": "p1"}));
    }

    #[test]
    fn palette_tasks_are_not_emitted() {
        let mut tasks = crate::palette::field_palette();
        tasks.push(Task::labeled("", "Name", FieldKind::empty(FieldType::TextInput)));
        let records = emit_records(&tasks);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "idName");
    }
}
