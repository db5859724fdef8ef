//! Drag/drop reorder engine for the single-page designer.
//!
//! One gesture runs Idle → Dragging → (drop | end) → Idle. The engine never
//! mutates tasks itself: a drop yields a `DropOutcome` whose mutation the
//! caller applies, usually through the `CommandStack`.
//!
//! | Source  | Drop on canvas                     | Drop on palette |
//! |---------|------------------------------------|-----------------|
//! | palette | instantiate a copy at hover / end  | ignored         |
//! | canvas  | move to the hovered task's index   | ignored         |

use crate::designer::TaskMutation;
use fo_core::TaskId;
use fo_core::model::{Status, Task, TaskList};
use fo_core::palette::instantiate;

/// Where a drop happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// "Form Structure".
    Canvas,
    /// "Form Components".
    Palette,
}

/// Per-gesture drag state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// The dragged task as it was when the gesture started.
        task: Box<Task>,
        /// The canvas task currently under the pointer.
        over: Option<TaskId>,
    },
}

/// What a drop amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A palette template was cloned onto the canvas.
    Instantiated { task: Box<Task>, index: usize },
    /// A canvas task moves from one canvas index to another.
    Reordered { from: usize, to: usize },
    /// Nothing to do.
    Ignored,
}

impl DropOutcome {
    pub fn into_mutation(self) -> Option<TaskMutation> {
        match self {
            DropOutcome::Instantiated { task, index } => Some(TaskMutation::Insert { index, task }),
            DropOutcome::Reordered { from, to } => Some(TaskMutation::Move { from, to }),
            DropOutcome::Ignored => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging a task out of `from`. Returns false when that zone has
    /// no task with this id.
    pub fn drag_start(&mut self, tasks: &TaskList, from: DropZone, id: TaskId) -> bool {
        let source = match from {
            DropZone::Canvas => tasks.canvas_get(id),
            DropZone::Palette => tasks.palette_get(id),
        };
        match source {
            Some(task) => {
                self.state = DragState::Dragging {
                    task: Box::new(task.clone()),
                    over: None,
                };
                true
            }
            None => {
                log::debug!("drag_start: no task {id} in {from:?}");
                self.state = DragState::Idle;
                false
            }
        }
    }

    /// The pointer entered a canvas task.
    pub fn drag_enter(&mut self, target: TaskId) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = Some(target);
        }
    }

    /// Drag ended without a drop (or after one). Always returns to Idle.
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
    }

    /// Resolve a drop against the current tasks. The gesture is over either
    /// way.
    pub fn drop(&mut self, zone: DropZone, tasks: &TaskList) -> DropOutcome {
        let DragState::Dragging { task, over } = std::mem::take(&mut self.state) else {
            log::debug!("drop without an active drag");
            return DropOutcome::Ignored;
        };
        if zone == DropZone::Palette {
            return DropOutcome::Ignored;
        }

        let hovered = over.and_then(|id| tasks.canvas_index(id));
        match task.status {
            Status::Palette => DropOutcome::Instantiated {
                task: Box::new(instantiate(&task)),
                index: hovered.unwrap_or(tasks.canvas_len()),
            },
            Status::Canvas => match (tasks.canvas_index(task.id), hovered) {
                (Some(from), Some(to)) if from != to => DropOutcome::Reordered { from, to },
                _ => DropOutcome::Ignored,
            },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
