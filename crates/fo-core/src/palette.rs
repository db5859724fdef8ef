//! Palette catalogs: the draggable templates shown in "Form Components".

use crate::id::TaskId;
use crate::model::{FieldKind, FieldType, Status, Task};
use serde::Serialize;

/// Template ids and types for the single-page field palette, in display order.
const FIELD_TEMPLATES: [(&str, FieldType); 11] = [
    ("template-text-element", FieldType::TextInput),
    ("template-textarea-element", FieldType::TextArea),
    ("template-checkbox-element", FieldType::Checkbox),
    ("template-toggle-element", FieldType::Toggle),
    ("template-slider-element", FieldType::Slider),
    ("template-dropdown", FieldType::DropDown),
    ("template-radio", FieldType::Radio),
    ("template-spinner", FieldType::NumberSpinner),
    ("template-star-rating", FieldType::StarRating),
    ("template-date-picker", FieldType::DatePicker),
    ("template-digital-signature", FieldType::DigitalSignature),
];

pub const PAGE_TEMPLATE_ID: &str = "template-page";
pub const QUESTION_TEMPLATE_ID: &str = "template-question";

fn template(id: &str, ty: FieldType) -> Task {
    Task {
        status: Status::Palette,
        ..Task::new(TaskId::intern(id), FieldKind::empty(ty))
    }
}

/// The field palette for the single-page designer.
pub fn field_palette() -> Vec<Task> {
    FIELD_TEMPLATES
        .iter()
        .map(|&(id, ty)| template(id, ty))
        .collect()
}

/// The structural palette for the multi-page designer.
pub fn page_palette() -> Vec<Task> {
    let mut page = template(PAGE_TEMPLATE_ID, FieldType::Page);
    if let FieldKind::Page { title, .. } = &mut page.kind {
        *title = "Untitled Page".into();
    }
    let mut question = template(QUESTION_TEMPLATE_ID, FieldType::Question);
    question.label = "Untitled Question".into();
    vec![page, question]
}

/// A palette template as shown in "Form Components": the task plus the
/// glyph drawn next to its type name.
#[derive(Debug, Clone, Serialize)]
pub struct PaletteItem<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub glyph: &'static str,
}

impl<'a> From<&'a Task> for PaletteItem<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            task,
            glyph: task.field_type().palette_glyph(),
        }
    }
}

/// Display entries for a palette, in order.
pub fn palette_items<'a>(templates: impl IntoIterator<Item = &'a Task>) -> Vec<PaletteItem<'a>> {
    templates.into_iter().map(PaletteItem::from).collect()
}

/// Default text given to a field instantiated from a palette template.
pub fn instance_text(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Toggle | FieldType::Checkbox => "Subscribe",
        _ => "Text Field",
    }
}

/// Clone a palette template into a new canvas task with a fresh id and the
/// type's default attributes.
pub fn instantiate(template: &Task) -> Task {
    let ty = template.field_type();
    Task {
        id: TaskId::fresh(),
        status: Status::Canvas,
        label: template.label.clone(),
        text: instance_text(ty).to_string(),
        kind: template.kind.clone().with_defaults(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_palette_covers_every_field_type_once() {
        let palette = field_palette();
        assert_eq!(palette.len(), 11);
        assert!(palette.iter().all(|t| t.status == Status::Palette));
        for ty in FieldType::ALL {
            let expected = usize::from(!(ty.is_structural() || ty == FieldType::FormElement));
            assert_eq!(
                palette.iter().filter(|t| t.field_type() == ty).count(),
                expected,
                "{ty:?}"
            );
        }
    }

    #[test]
    fn instantiate_toggle_seeds_yes_no() {
        let palette = field_palette();
        let toggle = palette
            .iter()
            .find(|t| t.field_type() == FieldType::Toggle)
            .unwrap();
        let task = instantiate(toggle);
        assert_eq!(task.status, Status::Canvas);
        assert_eq!(task.text, "Subscribe");
        assert_ne!(task.id, toggle.id);
        assert_eq!(
            task.kind,
            FieldKind::Toggle {
                toggle_on: "Yes".into(),
                toggle_off: "No".into()
            }
        );
    }

    #[test]
    fn palette_items_carry_type_glyphs() {
        let palette = field_palette();
        let items = palette_items(&palette);
        assert_eq!(items.len(), 11);
        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json[0]["id"], "template-text-element");
        assert_eq!(json[0]["type"], "TextInput");
        assert_eq!(json[0]["glyph"], "✏️");

        let pages = page_palette();
        let glyphs: Vec<&str> = palette_items(&pages).iter().map(|i| i.glyph).collect();
        assert_eq!(glyphs, vec!["📄", "📝"]);
    }

    #[test]
    fn instantiate_text_input_gets_generic_text() {
        let task = instantiate(&field_palette()[0]);
        assert_eq!(task.text, "Text Field");
        assert_eq!(task.field_type(), FieldType::TextInput);
    }
}
