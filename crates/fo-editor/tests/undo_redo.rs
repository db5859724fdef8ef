//! Integration tests: undo/redo command stack (fo-editor).
//!
//! Tests the CommandStack + Designer interaction, verifying that mutations
//! can be undone and redone correctly across crate boundaries.

use fo_core::model::*;
use fo_core::{FormError, TaskId};
use fo_editor::commands::CommandStack;
use fo_editor::designer::{Designer, DesignerConfig, TaskMutation};
use fo_editor::drag::{DragController, DropZone};
use pretty_assertions::assert_eq;

const SIGNUP: &str = include_str!("fixtures/signup.json");

fn make_designer() -> Designer {
    Designer::from_json(SIGNUP, DesignerConfig::default()).unwrap()
}

fn canvas_ids(designer: &Designer) -> Vec<String> {
    designer.canvas().map(|t| t.id.as_str().to_string()).collect()
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn undo_restores_previous_label() {
    let mut designer = make_designer();
    let mut stack = CommandStack::new(100);

    stack
        .execute(
            &mut designer,
            TaskMutation::Patch {
                id: TaskId::intern("idFullName"),
                patch: Box::new(TaskPatch {
                    label: Some("Legal name".into()),
                    ..Default::default()
                }),
            },
            "Edit full name",
        )
        .unwrap();
    assert_eq!(
        designer.task(TaskId::intern("idFullName")).unwrap().label,
        "Legal name"
    );

    let desc = stack.undo(&mut designer);
    assert_eq!(desc.as_deref(), Some("Edit full name"));
    assert_eq!(
        designer.task(TaskId::intern("idFullName")).unwrap().label,
        "Full name",
        "label not restored after undo"
    );

    stack.redo(&mut designer);
    assert_eq!(
        designer.task(TaskId::intern("idFullName")).unwrap().label,
        "Legal name"
    );
}

#[test]
fn undo_palette_drop_removes_instance() {
    let mut designer = make_designer();
    let mut stack = CommandStack::new(100);
    let mut drag = DragController::new();
    let before = designer.tasks().clone();

    let template = designer
        .palette()
        .find(|t| t.field_type() == FieldType::StarRating)
        .unwrap()
        .id;
    drag.drag_start(designer.tasks(), DropZone::Palette, template);
    drag.drag_enter(TaskId::intern("checkboxTerms"));
    let mutation = drag
        .drop(DropZone::Canvas, designer.tasks())
        .into_mutation()
        .unwrap();
    stack.execute(&mut designer, mutation, "Add star rating").unwrap();
    assert_eq!(designer.tasks().canvas_len(), 5);

    stack.undo(&mut designer);
    assert_eq!(designer.tasks(), &before);

    stack.redo(&mut designer);
    let types: Vec<FieldType> = designer.canvas().map(Task::field_type).collect();
    assert_eq!(types[2], FieldType::StarRating);
}

#[test]
fn undo_reorder_and_delete() {
    let mut designer = make_designer();
    let mut stack = CommandStack::new(100);
    let original = canvas_ids(&designer);

    let up = designer.adjacent_move(TaskId::intern("dropdownPlan"), true).unwrap();
    stack.execute(&mut designer, up, "Move up").unwrap();
    stack
        .execute(
            &mut designer,
            TaskMutation::Delete {
                id: TaskId::intern("idFullName"),
            },
            "Delete",
        )
        .unwrap();
    assert_eq!(canvas_ids(&designer), vec!["signupForm", "dropdownPlan", "checkboxTerms"]);

    stack.undo(&mut designer);
    stack.undo(&mut designer);
    assert_eq!(canvas_ids(&designer), original);
    assert!(!stack.can_undo());
}

#[test]
fn undo_load_restores_previous_canvas() {
    let mut designer = Designer::default();
    let mut stack = CommandStack::new(100);
    designer.create_form().unwrap();
    let before = designer.tasks().clone();

    let ticket = designer.begin_load();
    let mutation = designer.prepare_load(ticket, SIGNUP).unwrap();
    stack.execute(&mut designer, mutation, "Load template").unwrap();
    assert_eq!(designer.tasks().canvas_len(), 4);

    stack.undo(&mut designer);
    assert_eq!(designer.tasks(), &before);
}

#[test]
fn rejected_mutation_is_not_recorded() {
    let mut designer = make_designer();
    let mut stack = CommandStack::new(100);
    let result = stack.execute(&mut designer, TaskMutation::CreateForm, "Create form");
    assert!(matches!(result, Err(FormError::FormElementExists)));
    assert!(!stack.can_undo());
}

#[test]
fn stale_load_is_refused() {
    let mut designer = make_designer();
    let first = designer.begin_load();
    let second = designer.begin_load();
    assert!(matches!(
        designer.prepare_load(first, "[]"),
        Err(FormError::StaleLoad { .. })
    ));
    assert_eq!(designer.finish_load(second, "[]").unwrap(), 0);
}

#[test]
fn new_action_clears_redo() {
    let mut designer = make_designer();
    let mut stack = CommandStack::new(100);
    stack
        .execute(&mut designer, TaskMutation::ClearCanvas, "Clear")
        .unwrap();
    stack.undo(&mut designer);
    assert!(stack.can_redo());
    stack
        .execute(
            &mut designer,
            TaskMutation::Delete {
                id: TaskId::intern("checkboxTerms"),
            },
            "Delete",
        )
        .unwrap();
    assert!(!stack.can_redo());
}
