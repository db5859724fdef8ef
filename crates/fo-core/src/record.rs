//! Canonical export records: the JSON shapes consumed by the form renderer.

use serde::{Serialize, Serializer};

/// One entry of the canonical single-page form JSON.
///
/// Recognized field types serialize with exactly their own attribute set;
/// anything else falls back to `{type, id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaEntry {
    Field(FieldRecord),
    Opaque {
        #[serde(rename = "type")]
        type_name: String,
        id: String,
    },
}

impl SchemaEntry {
    pub fn id(&self) -> &str {
        match self {
            SchemaEntry::Field(record) => record.id(),
            SchemaEntry::Opaque { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum FieldRecord {
    FormElement {
        id: String,
        form_icon: String,
        form_subtitle: String,
        form_name: String,
        form_identifier: String,
        form_style: String,
    },
    TextInput {
        id: String,
        label: String,
        icon: String,
    },
    TextArea {
        id: String,
        label: String,
        required: bool,
        icon: String,
    },
    Checkbox {
        id: String,
        label: String,
        checked_value: String,
        unchecked_value: String,
    },
    Toggle {
        id: String,
        label: String,
        toggle_on: String,
        toggle_off: String,
    },
    DropDown {
        id: String,
        label: String,
        options: Vec<String>,
    },
    Radio {
        id: String,
        label: String,
        options: Vec<String>,
    },
    Slider {
        id: String,
        label: String,
        #[serde(serialize_with = "compact_number")]
        min: f64,
        #[serde(serialize_with = "compact_number")]
        max: f64,
        #[serde(serialize_with = "compact_number")]
        step: f64,
        #[serde(serialize_with = "compact_number")]
        default_value: f64,
    },
    NumberSpinner {
        id: String,
        label: String,
        #[serde(serialize_with = "compact_number")]
        min: f64,
        #[serde(serialize_with = "compact_number")]
        max: f64,
        #[serde(serialize_with = "compact_number")]
        step: f64,
        #[serde(serialize_with = "compact_number")]
        default_value: f64,
    },
    DigitalSignature {
        id: String,
        label: String,
        required: bool,
        #[serde(skip_serializing_if = "String::is_empty")]
        signer_name: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        signature_url: String,
    },
    StarRating {
        id: String,
        label: String,
        max_stars: u32,
    },
    DatePicker {
        id: String,
        label: String,
        icon: String,
        required: bool,
        default_value: String,
    },
}

impl FieldRecord {
    pub fn id(&self) -> &str {
        match self {
            FieldRecord::FormElement { id, .. }
            | FieldRecord::TextInput { id, .. }
            | FieldRecord::TextArea { id, .. }
            | FieldRecord::Checkbox { id, .. }
            | FieldRecord::Toggle { id, .. }
            | FieldRecord::DropDown { id, .. }
            | FieldRecord::Radio { id, .. }
            | FieldRecord::Slider { id, .. }
            | FieldRecord::NumberSpinner { id, .. }
            | FieldRecord::DigitalSignature { id, .. }
            | FieldRecord::StarRating { id, .. }
            | FieldRecord::DatePicker { id, .. } => id,
        }
    }
}

/// Emit integral values as JSON integers (`10`, not `10.0`).
fn compact_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
