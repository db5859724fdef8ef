//! Lint diagnostics for form designs.
//!
//! Reports structural issues without modifying the tasks.
//! Results feed the designer's problem list through the WASM bridge.

use crate::id::TaskId;
use crate::model::{FieldKind, RangeDefaults, SLIDER_DEFAULTS, SPINNER_DEFAULTS, Task};
use crate::pages::MultiPageDocument;
use crate::transform::duplicate_ids;
use serde::Serialize;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Should be fixed; likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintDiagnostic {
    /// The task this diagnostic refers to (empty for form-wide findings).
    pub task_id: TaskId,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "empty-options").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the canvas partition and return diagnostics.
#[must_use]
pub fn lint_tasks(tasks: &[Task]) -> Vec<LintDiagnostic> {
    let canvas: Vec<&Task> = tasks.iter().filter(|t| t.is_canvas()).collect();
    let mut diags = Vec::new();
    lint_duplicate_ids(&canvas, &mut diags);
    lint_blank_ids(&canvas, &mut diags);
    lint_empty_options(&canvas, &mut diags);
    lint_ranges(&canvas, &mut diags);
    lint_missing_form_element(&canvas, &mut diags);
    diags
}

/// Run the multi-page rules: duplicate ids across the whole tree and pages
/// without questions.
#[must_use]
pub fn lint_multipage(doc: &MultiPageDocument) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    let mut seen = HashSet::new();
    let ids = doc.forms.iter().flat_map(|form| {
        std::iter::once(form.id).chain(
            form.pages
                .iter()
                .flat_map(|p| std::iter::once(p.id).chain(p.questions.iter().map(|q| q.id))),
        )
    });
    for id in ids {
        if !id.is_blank() && !seen.insert(id) {
            diags.push(duplicate_diag(id));
        }
    }
    for page in doc.pages().filter(|p| p.questions.is_empty()) {
        diags.push(LintDiagnostic {
            task_id: page.id,
            message: format!("Page \"{}\" has no questions.", page.title),
            severity: LintSeverity::Info,
            rule: "empty-page",
        });
    }
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn duplicate_diag(id: TaskId) -> LintDiagnostic {
    LintDiagnostic {
        task_id: id,
        message: format!("Id `{id}` is used by more than one field."),
        severity: LintSeverity::Warning,
        rule: "duplicate-id",
    }
}

/// Warn once per id shared by two or more fields (after label derivation).
fn lint_duplicate_ids(canvas: &[&Task], diags: &mut Vec<LintDiagnostic>) {
    for id in duplicate_ids(canvas.iter().copied()) {
        diags.push(duplicate_diag(TaskId::intern(&id)));
    }
}

/// Radio buttons and the form root never derive an id from their label.
fn lint_blank_ids(canvas: &[&Task], diags: &mut Vec<LintDiagnostic>) {
    for task in canvas {
        if task.field_type().id_prefix().is_none() && task.id.is_blank() {
            diags.push(LintDiagnostic {
                task_id: task.id,
                message: format!(
                    "{} \"{}\" has no id and will be exported with an empty one.",
                    task.field_type().as_str(),
                    task.display_label()
                ),
                severity: LintSeverity::Warning,
                rule: "blank-id",
            });
        }
    }
}

fn lint_empty_options(canvas: &[&Task], diags: &mut Vec<LintDiagnostic>) {
    for task in canvas {
        if let FieldKind::DropDown { options } | FieldKind::Radio { options } = &task.kind
            && options.is_empty()
        {
            diags.push(LintDiagnostic {
                task_id: task.id,
                message: format!("\"{}\" has no options to choose from.", task.display_label()),
                severity: LintSeverity::Warning,
                rule: "empty-options",
            });
        }
    }
}

fn lint_ranges(canvas: &[&Task], diags: &mut Vec<LintDiagnostic>) {
    for task in canvas {
        let range = match &task.kind {
            FieldKind::Slider(range) => range.resolve(SLIDER_DEFAULTS),
            FieldKind::NumberSpinner(range) => range.resolve(SPINNER_DEFAULTS),
            _ => continue,
        };
        if let Some(problem) = range_problem(&range) {
            diags.push(LintDiagnostic {
                task_id: task.id,
                message: format!("\"{}\": {problem}.", task.display_label()),
                severity: LintSeverity::Warning,
                rule: "invalid-range",
            });
        }
    }
}

fn range_problem(range: &RangeDefaults) -> Option<String> {
    if range.min > range.max {
        Some(format!("min {} is greater than max {}", range.min, range.max))
    } else if range.step <= 0.0 {
        Some(format!("step {} must be positive", range.step))
    } else if range.default_value < range.min || range.default_value > range.max {
        Some(format!(
            "default {} is outside {}..={}",
            range.default_value, range.min, range.max
        ))
    } else {
        None
    }
}

/// Info when fields exist but no form root does.
fn lint_missing_form_element(canvas: &[&Task], diags: &mut Vec<LintDiagnostic>) {
    if !canvas.is_empty() && !canvas.iter().any(|t| t.is_form_element()) {
        diags.push(LintDiagnostic {
            task_id: TaskId::default(),
            message: "The form has fields but no Form element.".into(),
            severity: LintSeverity::Info,
            rule: "missing-form-element",
        });
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
