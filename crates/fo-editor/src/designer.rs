//! Single-page designer engine.
//!
//! The designer owns the task collection (palette + canvas) and is the only
//! writer to it. UI callbacks never touch tasks directly: they describe a
//! change as a `TaskMutation` and hand it to `apply_mutation`, usually via the
//! `CommandStack` so it can be undone.
//!
//! Serialization always works on an owned snapshot of the canvas, so edits
//! made while an export is in flight cannot tear it.

use crate::commands::Editable;
use crate::loader::{LoadTicket, LoadTracker};
use fo_core::export::{ExportConfig, export_document, export_records};
use fo_core::lint::{LintDiagnostic, lint_tasks};
use fo_core::model::*;
use fo_core::parser::parse_document;
use fo_core::record::SchemaEntry;
use fo_core::{FormError, TaskId};
use serde::{Deserialize, Serialize};

// ─── Config ──────────────────────────────────────────────────────────────

/// Host-supplied designer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    /// Maximum number of undo steps kept. Default: **200**.
    pub undo_depth: usize,
    /// Settings for save/preview exports.
    pub export: ExportConfig,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            undo_depth: 200,
            export: ExportConfig::default(),
        }
    }
}

// ─── Mutations ───────────────────────────────────────────────────────────

/// A single change to the task collection. Indices are canvas indices.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMutation {
    /// Append the form root. Rejected if the canvas already has one.
    CreateForm,
    /// Insert a task into the canvas at `index` (clamped to the end).
    Insert { index: usize, task: Box<Task> },
    /// Remove the canvas task at `index`.
    RemoveAt { index: usize },
    /// Remove a canvas task and reinsert it at `to`.
    Move { from: usize, to: usize },
    /// Apply an edit dialog's save to one task.
    Patch { id: TaskId, patch: Box<TaskPatch> },
    /// Delete a canvas task by id.
    Delete { id: TaskId },
    /// Replace the whole canvas (template load).
    ReplaceCanvas { tasks: Vec<Task> },
    /// Empty the canvas, keeping the palette.
    ClearCanvas,
}

// ─── Designer ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Designer {
    tasks: TaskList,
    config: DesignerConfig,
    loads: LoadTracker,
}

impl Default for Designer {
    fn default() -> Self {
        Self::new(DesignerConfig::default())
    }
}

impl Designer {
    /// A designer with the standard field palette and an empty canvas.
    pub fn new(config: DesignerConfig) -> Self {
        Self {
            tasks: TaskList::with_palette(),
            config,
            loads: LoadTracker::new(),
        }
    }

    /// A designer with the standard palette and a canvas loaded from JSON.
    ///
    /// # Errors
    /// Parse errors from the canonical JSON.
    pub fn from_json(json: &str, config: DesignerConfig) -> Result<Self, FormError> {
        let mut designer = Self::new(config);
        designer.load_json(json)?;
        Ok(designer)
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn canvas(&self) -> impl Iterator<Item = &Task> {
        self.tasks.canvas()
    }

    pub fn palette(&self) -> impl Iterator<Item = &Task> {
        self.tasks.palette()
    }

    /// A canvas task, or failing that a palette template.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks
            .canvas_get(id)
            .or_else(|| self.tasks.palette_get(id))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a mutation. Returns whether the collection changed.
    ///
    /// Validation happens before any change: an `Err` leaves the collection
    /// exactly as it was. Only canvas tasks are ever edited or removed; the
    /// palette is a fixed catalog. Replacing or clearing the canvas supersedes
    /// any load still in flight.
    ///
    /// # Errors
    /// `FormElementExists` for a second form root, `TaskNotFound` for an
    /// unknown id in `Patch`/`Delete`.
    pub fn apply_mutation(&mut self, mutation: TaskMutation) -> Result<bool, FormError> {
        log::debug!("apply {mutation:?}");
        match mutation {
            TaskMutation::CreateForm => {
                if self.tasks.has_form_element() {
                    return Err(FormError::FormElementExists);
                }
                self.tasks.insert_canvas(usize::MAX, Task::form_element());
                Ok(true)
            }
            TaskMutation::Insert { index, task } => {
                if task.is_form_element() && self.tasks.has_form_element() {
                    return Err(FormError::FormElementExists);
                }
                self.tasks.insert_canvas(index, *task);
                Ok(true)
            }
            TaskMutation::RemoveAt { index } => Ok(self.tasks.remove_canvas_at(index).is_some()),
            TaskMutation::Move { from, to } => Ok(self.tasks.move_canvas(from, to)),
            TaskMutation::Patch { id, patch } => {
                let task = self
                    .tasks
                    .canvas_get_mut(id)
                    .ok_or_else(|| FormError::TaskNotFound(id.to_string()))?;
                let before = task.clone();
                task.apply_patch(&patch);
                Ok(*task != before)
            }
            TaskMutation::Delete { id } => {
                let index = self
                    .tasks
                    .canvas_index(id)
                    .ok_or_else(|| FormError::TaskNotFound(id.to_string()))?;
                Ok(self.tasks.remove_canvas_at(index).is_some())
            }
            TaskMutation::ReplaceCanvas { tasks } => {
                self.loads.invalidate();
                self.tasks.replace_canvas(single_form(tasks));
                Ok(true)
            }
            TaskMutation::ClearCanvas => {
                self.loads.invalidate();
                let had_canvas = self.tasks.canvas_len() > 0;
                self.tasks.clear_canvas();
                Ok(had_canvas)
            }
        }
    }

    /// "Create Form": append a FormElement to the canvas.
    ///
    /// # Errors
    /// `FormError::FormElementExists` when the canvas already has one.
    pub fn create_form(&mut self) -> Result<TaskId, FormError> {
        self.apply_mutation(TaskMutation::CreateForm)?;
        self.tasks
            .canvas()
            .find(|t| t.is_form_element())
            .map(|t| t.id)
            .ok_or(FormError::NoFormElement)
    }

    /// Swap a canvas task with its predecessor. False at the top or for an
    /// unknown id.
    pub fn move_up(&mut self, id: TaskId) -> bool {
        match self.tasks.canvas_index(id) {
            Some(index) if index > 0 => self.tasks.move_canvas(index, index - 1),
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: TaskId) -> bool {
        match self.tasks.canvas_index(id) {
            Some(index) => self.tasks.move_canvas(index, index + 1),
            None => false,
        }
    }

    /// The `Move` mutation equivalent to `move_up`/`move_down`, for the
    /// command stack.
    pub fn adjacent_move(&self, id: TaskId, up: bool) -> Option<TaskMutation> {
        let from = self.tasks.canvas_index(id)?;
        let to = if up {
            from.checked_sub(1)?
        } else {
            from + 1
        };
        (to < self.tasks.canvas_len()).then_some(TaskMutation::Move { from, to })
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    /// Replace the canvas with a parsed document. The document is parsed in
    /// full before anything changes.
    ///
    /// # Errors
    /// Parse errors; the canvas is untouched.
    pub fn load_json(&mut self, json: &str) -> Result<usize, FormError> {
        let tasks = parse_document(json)?;
        self.apply_mutation(TaskMutation::ReplaceCanvas { tasks })?;
        Ok(self.tasks.canvas_len())
    }

    /// Start an asynchronous load. Any earlier pending load becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.issue()
    }

    /// Validate and parse the response for `ticket`, yielding the mutation
    /// that installs it. Nothing is applied here.
    ///
    /// # Errors
    /// `FormError::StaleLoad` when a newer load was started, or a parse
    /// error.
    pub fn prepare_load(&self, ticket: LoadTicket, json: &str) -> Result<TaskMutation, FormError> {
        self.loads.accept(ticket)?;
        let tasks = parse_document(json)?;
        Ok(TaskMutation::ReplaceCanvas { tasks })
    }

    /// `prepare_load` followed by applying the result.
    ///
    /// # Errors
    /// As for `prepare_load`.
    pub fn finish_load(&mut self, ticket: LoadTicket, json: &str) -> Result<usize, FormError> {
        let mutation = self.prepare_load(ticket, json)?;
        self.apply_mutation(mutation)?;
        Ok(self.tasks.canvas_len())
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Owned copy of the canvas for an in-flight export.
    pub fn snapshot_canvas(&self) -> Vec<Task> {
        self.tasks.canvas_snapshot()
    }

    /// # Errors
    /// `FormError::DuplicateId` under the `Reject` policy.
    pub fn export_records(&self) -> Result<Vec<SchemaEntry>, FormError> {
        export_records(&self.snapshot_canvas(), &self.config.export)
    }

    /// # Errors
    /// `FormError::DuplicateId` under the `Reject` policy.
    pub fn export_json(&self) -> Result<String, FormError> {
        export_document(&self.snapshot_canvas(), &self.config.export)
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_tasks(self.tasks.all())
    }
}

/// Keep the first Form element of a loaded canvas and drop the rest.
fn single_form(mut tasks: Vec<Task>) -> Vec<Task> {
    let mut seen_form = false;
    tasks.retain(|task| {
        if !task.is_form_element() {
            return true;
        }
        if seen_form {
            log::warn!("dropping extra Form element {} from loaded canvas", task.id);
            return false;
        }
        seen_form = true;
        true
    });
    tasks
}

impl Editable for Designer {
    type Mutation = TaskMutation;
    type Snapshot = TaskList;

    fn apply_mutation(&mut self, mutation: TaskMutation) -> Result<bool, FormError> {
        Designer::apply_mutation(self, mutation)
    }

    fn inverse_of(&self, mutation: &TaskMutation) -> Option<TaskMutation> {
        match mutation {
            TaskMutation::Insert { index, .. } => Some(TaskMutation::RemoveAt {
                index: (*index).min(self.tasks.canvas_len()),
            }),
            TaskMutation::RemoveAt { index } => {
                let task = self.tasks.canvas().nth(*index)?;
                Some(TaskMutation::Insert {
                    index: *index,
                    task: Box::new(task.clone()),
                })
            }
            TaskMutation::Delete { id } => {
                let index = self.tasks.canvas_index(*id)?;
                let task = self.tasks.canvas().nth(index)?;
                Some(TaskMutation::Insert {
                    index,
                    task: Box::new(task.clone()),
                })
            }
            TaskMutation::Move { from, to } => Some(TaskMutation::Move {
                from: *to,
                to: *from,
            }),
            TaskMutation::CreateForm
            | TaskMutation::Patch { .. }
            | TaskMutation::ReplaceCanvas { .. }
            | TaskMutation::ClearCanvas => None,
        }
    }

    fn snapshot(&self) -> TaskList {
        self.tasks.clone()
    }

    fn restore(&mut self, snapshot: TaskList) {
        self.tasks = snapshot;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
