//! Core task model for the form designer.
//!
//! A form under construction is a single ordered collection of `Task`s.
//! The `status` field partitions it into the canvas ("Form Structure") and
//! the palette ("Form Components"). Each task carries one `FieldKind`, a
//! closed sum type whose variants hold exactly the attributes of that field
//! type. Defaults for every type live in one table (`FieldKind::with_defaults`)
//! shared by the emitter and the parser.

use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered option list for DropDown and Radio fields.
pub type Options = SmallVec<[String; 4]>;

// ─── Status ──────────────────────────────────────────────────────────────

/// Which zone a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// The canvas: the form being built.
    #[default]
    #[serde(rename = "New Order")]
    Canvas,
    /// The palette: draggable templates, never consumed.
    #[serde(rename = "In Progress")]
    Palette,
}

// ─── Field type tags ─────────────────────────────────────────────────────

/// Fieldless tag for every task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    FormElement,
    TextInput,
    TextArea,
    Checkbox,
    Toggle,
    DropDown,
    Radio,
    Slider,
    NumberSpinner,
    DigitalSignature,
    StarRating,
    DatePicker,
    Page,
    Question,
}

impl FieldType {
    pub const ALL: [FieldType; 14] = [
        FieldType::FormElement,
        FieldType::TextInput,
        FieldType::TextArea,
        FieldType::Checkbox,
        FieldType::Toggle,
        FieldType::DropDown,
        FieldType::Radio,
        FieldType::Slider,
        FieldType::NumberSpinner,
        FieldType::DigitalSignature,
        FieldType::StarRating,
        FieldType::DatePicker,
        FieldType::Page,
        FieldType::Question,
    ];

    /// The `type` tag used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::FormElement => "FormElement",
            FieldType::TextInput => "TextInput",
            FieldType::TextArea => "TextArea",
            FieldType::Checkbox => "Checkbox",
            FieldType::Toggle => "Toggle",
            FieldType::DropDown => "DropDown",
            FieldType::Radio => "Radio",
            FieldType::Slider => "Slider",
            FieldType::NumberSpinner => "NumberSpinner",
            FieldType::DigitalSignature => "DigitalSignature",
            FieldType::StarRating => "StarRating",
            FieldType::DatePicker => "DatePicker",
            FieldType::Page => "Page",
            FieldType::Question => "Question",
        }
    }

    /// Parse a JSON `type` tag. Case-sensitive, like the wire format.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Prefix for ids derived from labels. `None` means the task's own id
    /// is always used verbatim (FormElement, Radio, structural nodes).
    pub fn id_prefix(self) -> Option<&'static str> {
        match self {
            FieldType::TextInput => Some("id"),
            FieldType::TextArea => Some("textarea"),
            FieldType::Checkbox => Some("checkbox"),
            FieldType::Toggle => Some("toggle"),
            FieldType::DropDown => Some("dropdown"),
            FieldType::Slider => Some("slider"),
            FieldType::NumberSpinner => Some("spinner"),
            FieldType::DigitalSignature => Some("signature"),
            FieldType::StarRating => Some("rating"),
            FieldType::DatePicker => Some("date"),
            FieldType::FormElement | FieldType::Radio | FieldType::Page | FieldType::Question => {
                None
            }
        }
    }

    /// Label emitted when a field has none.
    pub fn default_label(self) -> &'static str {
        match self {
            FieldType::Slider => "Slider",
            FieldType::NumberSpinner => "Spinner",
            FieldType::DigitalSignature => "Signature",
            FieldType::StarRating => "Rating",
            FieldType::DatePicker => "Select Date",
            _ => "",
        }
    }

    /// Glyph shown next to the type name in the palette.
    pub fn palette_glyph(self) -> &'static str {
        match self {
            FieldType::TextInput => "✏️",
            FieldType::TextArea => "📄",
            FieldType::Checkbox => "☑️",
            FieldType::Toggle => "🔁",
            FieldType::Slider => "🎚️",
            FieldType::DropDown => "🔽",
            FieldType::Radio => "🔘",
            FieldType::DatePicker => "📅",
            FieldType::NumberSpinner => "🧮",
            FieldType::StarRating => "⭐️",
            FieldType::DigitalSignature => "🖋️",
            FieldType::Page => "📄",
            FieldType::Question => "📝",
            FieldType::FormElement => "❓",
        }
    }

    /// Structural nodes only exist in multi-page documents.
    pub fn is_structural(self) -> bool {
        matches!(self, FieldType::Page | FieldType::Question)
    }
}

// ─── Numeric ranges ──────────────────────────────────────────────────────

/// Slider / NumberSpinner bounds. `None` means "use the type default".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumericRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
}

/// A fully resolved range: one row of the defaults table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeDefaults {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default_value: f64,
}

pub const SLIDER_DEFAULTS: RangeDefaults = RangeDefaults {
    min: 0.0,
    max: 10.0,
    step: 1.0,
    default_value: 5.0,
};

pub const SPINNER_DEFAULTS: RangeDefaults = RangeDefaults {
    min: 0.0,
    max: 100.0,
    step: 1.0,
    default_value: 0.0,
};

pub const DEFAULT_MAX_STARS: u32 = 5;
pub const DEFAULT_DATE_ICON: &str = "📅";
pub const DEFAULT_QUESTION_ICON: &str = "person";
pub const DEFAULT_QUESTION_LABEL: &str = "Untitled Question";

impl NumericRange {
    pub const fn new(min: f64, max: f64, step: f64, default_value: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
            default_value: Some(default_value),
        }
    }

    /// Resolve against a defaults row. Non-finite values count as absent.
    pub fn resolve(&self, defaults: RangeDefaults) -> RangeDefaults {
        let pick = |v: Option<f64>, d: f64| v.filter(|x| x.is_finite()).unwrap_or(d);
        RangeDefaults {
            min: pick(self.min, defaults.min),
            max: pick(self.max, defaults.max),
            step: pick(self.step, defaults.step),
            default_value: pick(self.default_value, defaults.default_value),
        }
    }

    fn filled(&self, defaults: RangeDefaults) -> Self {
        let r = self.resolve(defaults);
        Self::new(r.min, r.max, r.step, r.default_value)
    }
}

// ─── FormElement metadata ────────────────────────────────────────────────

/// Root metadata for a form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormMeta {
    pub form_name: String,
    pub form_subtitle: String,
    pub form_style: String,
    pub form_icon: String,
    pub form_identifier: String,
}

impl FormMeta {
    /// Metadata for a freshly created form ("Create Form").
    pub fn untitled() -> Self {
        Self {
            form_name: "Untitled".into(),
            form_identifier: uuid::Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }
}

// ─── Questions ───────────────────────────────────────────────────────────

/// A question nested inside a multi-page `Page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    pub id: TaskId,
    pub label: String,
    pub icon: String,
    pub required: bool,
}

impl Default for Question {
    fn default() -> Self {
        Self {
            id: TaskId::default(),
            label: String::new(),
            icon: DEFAULT_QUESTION_ICON.into(),
            required: false,
        }
    }
}

impl Question {
    /// A new question as created by dropping the question template on a page.
    pub fn untitled() -> Self {
        Self {
            id: TaskId::fresh(),
            label: DEFAULT_QUESTION_LABEL.into(),
            ..Self::default()
        }
    }
}

// ─── Field kinds ─────────────────────────────────────────────────────────

/// Type-specific attributes of a task. Empty strings mean "use the default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum FieldKind {
    FormElement(FormMeta),
    TextInput {
        #[serde(default)]
        icon: String,
    },
    TextArea {
        #[serde(default)]
        icon: String,
        #[serde(default)]
        required: bool,
    },
    Checkbox {
        #[serde(default)]
        checked_value: String,
        #[serde(default)]
        unchecked_value: String,
    },
    Toggle {
        #[serde(default)]
        toggle_on: String,
        #[serde(default)]
        toggle_off: String,
    },
    DropDown {
        #[serde(default)]
        options: Options,
    },
    Radio {
        #[serde(default)]
        options: Options,
    },
    Slider(NumericRange),
    NumberSpinner(NumericRange),
    DigitalSignature {
        #[serde(default)]
        required: bool,
        #[serde(default)]
        signer_name: String,
        #[serde(default)]
        signature_url: String,
    },
    StarRating {
        #[serde(default)]
        max_stars: Option<u32>,
    },
    DatePicker {
        #[serde(default)]
        icon: String,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        default_value: String,
    },
    Page {
        #[serde(default)]
        title: String,
        #[serde(default)]
        questions: Vec<Question>,
    },
    Question {
        #[serde(default)]
        icon: String,
        #[serde(default)]
        required: bool,
    },
}

impl FieldKind {
    /// An attribute-less kind for the given type.
    pub fn empty(ty: FieldType) -> Self {
        match ty {
            FieldType::FormElement => FieldKind::FormElement(FormMeta::default()),
            FieldType::TextInput => FieldKind::TextInput {
                icon: String::new(),
            },
            FieldType::TextArea => FieldKind::TextArea {
                icon: String::new(),
                required: false,
            },
            FieldType::Checkbox => FieldKind::Checkbox {
                checked_value: String::new(),
                unchecked_value: String::new(),
            },
            FieldType::Toggle => FieldKind::Toggle {
                toggle_on: String::new(),
                toggle_off: String::new(),
            },
            FieldType::DropDown => FieldKind::DropDown {
                options: Options::new(),
            },
            FieldType::Radio => FieldKind::Radio {
                options: Options::new(),
            },
            FieldType::Slider => FieldKind::Slider(NumericRange::default()),
            FieldType::NumberSpinner => FieldKind::NumberSpinner(NumericRange::default()),
            FieldType::DigitalSignature => FieldKind::DigitalSignature {
                required: false,
                signer_name: String::new(),
                signature_url: String::new(),
            },
            FieldType::StarRating => FieldKind::StarRating { max_stars: None },
            FieldType::DatePicker => FieldKind::DatePicker {
                icon: String::new(),
                required: false,
                default_value: String::new(),
            },
            FieldType::Page => FieldKind::Page {
                title: String::new(),
                questions: Vec::new(),
            },
            FieldType::Question => FieldKind::Question {
                icon: String::new(),
                required: false,
            },
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::FormElement(_) => FieldType::FormElement,
            FieldKind::TextInput { .. } => FieldType::TextInput,
            FieldKind::TextArea { .. } => FieldType::TextArea,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::Toggle { .. } => FieldType::Toggle,
            FieldKind::DropDown { .. } => FieldType::DropDown,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Slider(_) => FieldType::Slider,
            FieldKind::NumberSpinner(_) => FieldType::NumberSpinner,
            FieldKind::DigitalSignature { .. } => FieldType::DigitalSignature,
            FieldKind::StarRating { .. } => FieldType::StarRating,
            FieldKind::DatePicker { .. } => FieldType::DatePicker,
            FieldKind::Page { .. } => FieldType::Page,
            FieldKind::Question { .. } => FieldType::Question,
        }
    }

    /// Fill every absent attribute from the type's defaults table.
    ///
    /// FormElement metadata and structural nodes are left untouched.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        fn fill(slot: &mut String, default: &str) {
            if slot.is_empty() {
                *slot = default.to_string();
            }
        }

        match &mut self {
            FieldKind::Checkbox {
                checked_value,
                unchecked_value,
            } => {
                fill(checked_value, "Checked");
                fill(unchecked_value, "Unchecked");
            }
            FieldKind::Toggle {
                toggle_on,
                toggle_off,
            } => {
                fill(toggle_on, "Yes");
                fill(toggle_off, "No");
            }
            FieldKind::Slider(range) => *range = range.filled(SLIDER_DEFAULTS),
            FieldKind::NumberSpinner(range) => *range = range.filled(SPINNER_DEFAULTS),
            FieldKind::StarRating { max_stars } => {
                max_stars.get_or_insert(DEFAULT_MAX_STARS);
            }
            FieldKind::DatePicker { icon, .. } => fill(icon, DEFAULT_DATE_ICON),
            FieldKind::Question { icon, .. } => fill(icon, DEFAULT_QUESTION_ICON),
            FieldKind::FormElement(_)
            | FieldKind::TextInput { .. }
            | FieldKind::TextArea { .. }
            | FieldKind::DropDown { .. }
            | FieldKind::Radio { .. }
            | FieldKind::DigitalSignature { .. }
            | FieldKind::Page { .. } => {}
        }
        self
    }
}

// ─── Task ────────────────────────────────────────────────────────────────

/// An editable form element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Task {
    /// A canvas task with no label.
    pub fn new(id: TaskId, kind: FieldKind) -> Self {
        Self {
            id,
            status: Status::Canvas,
            label: String::new(),
            text: String::new(),
            kind,
        }
    }

    /// A canvas task with a label.
    pub fn labeled(id: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            label: label.to_string(),
            ..Self::new(TaskId::intern(id), kind)
        }
    }

    /// The root form task created by "Create Form".
    pub fn form_element() -> Self {
        Self {
            text: "New Form Element".into(),
            ..Self::new(TaskId::fresh(), FieldKind::FormElement(FormMeta::untitled()))
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn is_canvas(&self) -> bool {
        self.status == Status::Canvas
    }

    pub fn is_form_element(&self) -> bool {
        matches!(self.kind, FieldKind::FormElement(_))
    }

    /// Label resolution: `label`, then `text`, then empty.
    pub fn display_label(&self) -> &str {
        if !self.label.is_empty() {
            &self.label
        } else {
            &self.text
        }
    }

    /// The id this task exports under: its own id when non-blank, otherwise
    /// one derived from its label with the type's prefix.
    pub fn resolved_id(&self) -> String {
        match self.field_type().id_prefix() {
            Some(prefix) if self.id.is_blank() => crate::id::to_id(prefix, self.display_label()),
            _ => self.id.as_str().to_string(),
        }
    }

    /// Apply an editor "save" to this task. Attributes that do not belong to
    /// the task's type are ignored.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(new_id) = patch.id.as_deref().map(str::trim)
            && !new_id.is_empty()
        {
            self.id = TaskId::intern(new_id);
        }

        match &mut self.kind {
            FieldKind::FormElement(meta) => {
                if let Some(name) = &patch.label {
                    meta.form_name = name.clone();
                }
                set(&mut meta.form_subtitle, &patch.form_subtitle);
                set(&mut meta.form_style, &patch.form_style);
                set(&mut meta.form_icon, &patch.form_icon);
                return;
            }
            FieldKind::TextInput { icon } => set(icon, &patch.icon),
            FieldKind::TextArea { icon, required } | FieldKind::Question { icon, required } => {
                set(icon, &patch.icon);
                set(required, &patch.required);
            }
            FieldKind::Checkbox {
                checked_value,
                unchecked_value,
            } => {
                set(checked_value, &patch.checked_value);
                set(unchecked_value, &patch.unchecked_value);
            }
            FieldKind::Toggle {
                toggle_on,
                toggle_off,
            } => {
                set(toggle_on, &patch.toggle_on);
                set(toggle_off, &patch.toggle_off);
            }
            FieldKind::DropDown { options } | FieldKind::Radio { options } => {
                if let Some(new_options) = &patch.options {
                    *options = new_options.iter().cloned().collect();
                }
            }
            FieldKind::Slider(range) | FieldKind::NumberSpinner(range) => {
                range.min = patch.min.or(range.min);
                range.max = patch.max.or(range.max);
                range.step = patch.step.or(range.step);
                if let Some(PatchValue::Number(v)) = patch.default_value {
                    range.default_value = Some(v);
                }
            }
            FieldKind::DigitalSignature { required, .. } => set(required, &patch.required),
            FieldKind::StarRating { max_stars } => {
                if patch.max_stars.is_some() {
                    *max_stars = patch.max_stars;
                }
            }
            FieldKind::DatePicker {
                icon,
                required,
                default_value,
            } => {
                set(icon, &patch.icon);
                set(required, &patch.required);
                if let Some(PatchValue::Text(date)) = &patch.default_value {
                    *default_value = date.clone();
                }
            }
            FieldKind::Page { title, .. } => set(title, &patch.label),
        }

        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

// ─── Task patch ──────────────────────────────────────────────────────────

/// A number or a date string, depending on the field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Number(f64),
    Text(String),
}

/// Partial update produced by a field's edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    /// New id; applied only when non-blank after trimming.
    pub id: Option<String>,
    /// New label (form name for FormElement, title for Page).
    pub label: Option<String>,
    pub icon: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub checked_value: Option<String>,
    pub unchecked_value: Option<String>,
    pub toggle_on: Option<String>,
    pub toggle_off: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub default_value: Option<PatchValue>,
    pub max_stars: Option<u32>,
    pub form_subtitle: Option<String>,
    pub form_style: Option<String>,
    pub form_icon: Option<String>,
}

// ─── Task list ───────────────────────────────────────────────────────────

/// The single ordered task collection, partitioned by `Status`.
///
/// Canvas order is exactly the relative order of canvas tasks in the vector;
/// palette entries keep their own positions through every canvas operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A list seeded with the field palette.
    #[must_use]
    pub fn with_palette() -> Self {
        Self {
            tasks: crate::palette::field_palette(),
        }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn canvas(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.status == Status::Canvas)
    }

    pub fn palette(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.status == Status::Palette)
    }

    pub fn canvas_len(&self) -> usize {
        self.canvas().count()
    }

    /// Owned copy of the canvas partition (the export snapshot).
    pub fn canvas_snapshot(&self) -> Vec<Task> {
        self.canvas().cloned().collect()
    }

    pub fn has_form_element(&self) -> bool {
        self.canvas().any(Task::is_form_element)
    }

    /// Canvas task with this id. Palette templates are never matched.
    pub fn canvas_get(&self, id: TaskId) -> Option<&Task> {
        self.canvas().find(|t| t.id == id)
    }

    pub fn canvas_get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.status == Status::Canvas && t.id == id)
    }

    /// Palette template with this id.
    pub fn palette_get(&self, id: TaskId) -> Option<&Task> {
        self.palette().find(|t| t.id == id)
    }

    /// Index of a canvas task within the canvas sublist.
    pub fn canvas_index(&self, id: TaskId) -> Option<usize> {
        self.canvas().position(|t| t.id == id)
    }

    /// Vector positions of canvas tasks, in canvas order.
    fn canvas_slots(&self) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == Status::Canvas)
            .map(|(i, _)| i)
            .collect()
    }

    /// Append a task at the end of the collection.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Insert a canvas task so it lands at `canvas_index` within the canvas
    /// sublist (clamped to the end).
    pub fn insert_canvas(&mut self, canvas_index: usize, mut task: Task) -> usize {
        task.status = Status::Canvas;
        let slots = self.canvas_slots();
        let index = canvas_index.min(slots.len());
        let position = match slots.get(index) {
            Some(&pos) => pos,
            None => slots.last().map_or(self.tasks.len(), |&last| last + 1),
        };
        self.tasks.insert(position, task);
        index
    }

    /// Move a canvas task from one canvas index to another. Returns false
    /// (leaving the list untouched) when either index is out of range or
    /// they are equal.
    pub fn move_canvas(&mut self, from: usize, to: usize) -> bool {
        let slots = self.canvas_slots();
        if from == to || from >= slots.len() || to >= slots.len() {
            return false;
        }
        let mut canvas: Vec<Task> = slots.iter().map(|&i| self.tasks[i].clone()).collect();
        let moved = canvas.remove(from);
        canvas.insert(to, moved);
        for (slot, task) in slots.into_iter().zip(canvas) {
            self.tasks[slot] = task;
        }
        true
    }

    /// Remove the task at `canvas_index` within the canvas sublist.
    pub fn remove_canvas_at(&mut self, canvas_index: usize) -> Option<Task> {
        let pos = *self.canvas_slots().get(canvas_index)?;
        Some(self.tasks.remove(pos))
    }

    /// Replace the whole canvas partition, keeping the palette.
    pub fn replace_canvas(&mut self, canvas: Vec<Task>) {
        self.tasks.retain(|t| t.status == Status::Palette);
        let palette = std::mem::take(&mut self.tasks);
        self.tasks = canvas
            .into_iter()
            .map(|mut t| {
                t.status = Status::Canvas;
                t
            })
            .collect();
        self.tasks.extend(palette);
    }

    pub fn clear_canvas(&mut self) {
        self.tasks.retain(|t| t.status == Status::Palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(list: &TaskList) -> Vec<&str> {
        list.canvas().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> TaskList {
        let mut list = TaskList::with_palette();
        list.replace_canvas(vec![
            Task::labeled("a", "A", FieldKind::empty(FieldType::TextInput)),
            Task::labeled("b", "B", FieldKind::empty(FieldType::Checkbox)),
            Task::labeled("c", "C", FieldKind::empty(FieldType::Toggle)),
        ]);
        list
    }

    #[test]
    fn field_type_tags_roundtrip() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::parse(ty.as_str()), Some(ty));
            assert_eq!(FieldKind::empty(ty).field_type(), ty);
        }
        assert_eq!(FieldType::parse("textinput"), None);
    }

    #[test]
    fn defaults_fill_only_absent_values() {
        let kind = FieldKind::Slider(NumericRange {
            max: Some(3.0),
            step: Some(f64::NAN),
            ..NumericRange::default()
        })
        .with_defaults();
        assert_eq!(kind, FieldKind::Slider(NumericRange::new(0.0, 3.0, 1.0, 5.0)));

        let toggle = FieldKind::empty(FieldType::Toggle).with_defaults();
        assert_eq!(
            toggle,
            FieldKind::Toggle {
                toggle_on: "Yes".into(),
                toggle_off: "No".into()
            }
        );
    }

    #[test]
    fn resolved_id_prefers_explicit_id() {
        let mut task = Task::labeled("", "Email Address", FieldKind::empty(FieldType::TextInput));
        assert_eq!(task.resolved_id(), "idEmailAddress");
        task.id = TaskId::intern("custom");
        assert_eq!(task.resolved_id(), "custom");

        let radio = Task::labeled("", "Pick one", FieldKind::empty(FieldType::Radio));
        assert_eq!(radio.resolved_id(), "");
    }

    #[test]
    fn display_label_falls_back_to_text() {
        let mut task = Task::new(TaskId::intern("t"), FieldKind::empty(FieldType::Checkbox));
        task.text = "Subscribe".into();
        assert_eq!(task.display_label(), "Subscribe");
        task.label = "Newsletter".into();
        assert_eq!(task.display_label(), "Newsletter");
    }

    #[test]
    fn patch_ignores_foreign_attributes() {
        let mut task = Task::labeled("cb", "Agree", FieldKind::empty(FieldType::Checkbox));
        task.apply_patch(&TaskPatch {
            id: Some("  ".into()),
            label: Some("I agree".into()),
            checked_value: Some("Y".into()),
            toggle_on: Some("ignored".into()),
            min: Some(4.0),
            ..TaskPatch::default()
        });
        assert_eq!(task.id.as_str(), "cb");
        assert_eq!(task.label, "I agree");
        assert_eq!(
            task.kind,
            FieldKind::Checkbox {
                checked_value: "Y".into(),
                unchecked_value: String::new()
            }
        );
    }

    #[test]
    fn patch_form_element_renames_form() {
        let mut task = Task::form_element();
        task.apply_patch(&TaskPatch {
            id: Some(" form1 ".into()),
            label: Some("Survey".into()),
            form_subtitle: Some("2026".into()),
            ..TaskPatch::default()
        });
        assert_eq!(task.id.as_str(), "form1");
        assert!(task.label.is_empty());
        match &task.kind {
            FieldKind::FormElement(meta) => {
                assert_eq!(meta.form_name, "Survey");
                assert_eq!(meta.form_subtitle, "2026");
            }
            other => panic!("expected FormElement, got {other:?}"),
        }
    }

    #[test]
    fn patch_date_and_slider_default_values() {
        let mut date = Task::labeled("d", "When", FieldKind::empty(FieldType::DatePicker));
        date.apply_patch(&TaskPatch {
            default_value: Some(PatchValue::Text("2025-01-01".into())),
            ..TaskPatch::default()
        });
        assert!(matches!(&date.kind, FieldKind::DatePicker { default_value, .. } if default_value == "2025-01-01"));

        let mut slider = Task::labeled("s", "Level", FieldKind::empty(FieldType::Slider));
        slider.apply_patch(&TaskPatch {
            default_value: Some(PatchValue::Number(7.0)),
            max: Some(20.0),
            ..TaskPatch::default()
        });
        assert!(matches!(
            &slider.kind,
            FieldKind::Slider(NumericRange { max: Some(m), default_value: Some(d), .. }) if *m == 20.0 && *d == 7.0
        ));
    }

    #[test]
    fn insert_canvas_keeps_palette_in_place() {
        let mut list = sample();
        let palette_before: Vec<_> = list.palette().cloned().collect();
        let idx = list.insert_canvas(1, Task::labeled("x", "X", FieldKind::empty(FieldType::Radio)));
        assert_eq!(idx, 1);
        assert_eq!(ids(&list), vec!["a", "x", "b", "c"]);
        let idx = list.insert_canvas(99, Task::labeled("y", "Y", FieldKind::empty(FieldType::Radio)));
        assert_eq!(idx, 4);
        assert_eq!(ids(&list), vec!["a", "x", "b", "c", "y"]);
        assert_eq!(list.palette().cloned().collect::<Vec<_>>(), palette_before);
    }

    #[test]
    fn insert_canvas_into_empty_canvas() {
        let mut list = TaskList::with_palette();
        list.insert_canvas(0, Task::labeled("only", "", FieldKind::empty(FieldType::TextArea)));
        assert_eq!(ids(&list), vec!["only"]);
    }

    #[test]
    fn move_canvas_reorders_and_rejects_bad_indices() {
        let mut list = sample();
        assert!(list.move_canvas(0, 2));
        assert_eq!(ids(&list), vec!["b", "c", "a"]);
        assert!(!list.move_canvas(1, 1));
        assert!(!list.move_canvas(0, 3));
        assert_eq!(ids(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn replace_and_clear_canvas_keep_palette() {
        let mut list = sample();
        let palette_len = list.palette().count();
        list.replace_canvas(vec![Task::form_element()]);
        assert_eq!(list.canvas_len(), 1);
        assert!(list.has_form_element());
        list.clear_canvas();
        assert_eq!(list.canvas_len(), 0);
        assert_eq!(list.palette().count(), palette_len);
    }

    #[test]
    fn canvas_lookups_skip_template_with_same_id() {
        let mut list = TaskList::with_palette();
        list.insert_canvas(0, Task::labeled("template-radio", "Pick", FieldKind::empty(FieldType::Radio)));

        assert_eq!(list.canvas_get(TaskId::intern("template-radio")).unwrap().label, "Pick");
        list.canvas_get_mut(TaskId::intern("template-radio")).unwrap().label = "Choose".into();
        let template = list.palette_get(TaskId::intern("template-radio")).unwrap();
        assert_eq!(template.status, Status::Palette);
        assert_eq!(template.label, "");

        let removed = list.remove_canvas_at(0).unwrap();
        assert_eq!(removed.label, "Choose");
        assert_eq!(list.canvas_len(), 0);
        assert_eq!(list.palette().count(), 11);
        assert!(list.remove_canvas_at(0).is_none());
    }

    #[test]
    fn task_json_uses_wire_names() {
        let task = Task::labeled(
            "t1",
            "Notify me",
            FieldKind::Toggle {
                toggle_on: "On".into(),
                toggle_off: "Off".into(),
            },
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "t1",
                "status": "New Order",
                "label": "Notify me",
                "type": "Toggle",
                "toggleOn": "On",
                "toggleOff": "Off",
            })
        );
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }
}
