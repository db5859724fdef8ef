pub mod commands;
pub mod designer;
pub mod drag;
pub mod loader;
pub mod multipage;

pub use commands::{Command, CommandStack, Editable};
pub use designer::{Designer, DesignerConfig, TaskMutation};
pub use drag::{DragController, DragState, DropOutcome, DropZone};
pub use loader::{LoadTicket, LoadTracker};
pub use multipage::{MultiPageDesigner, PageDropTarget, PageMutation};
