pub mod emitter;
pub mod error;
pub mod export;
pub mod icons;
pub mod id;
pub mod lint;
pub mod model;
pub mod pages;
pub mod palette;
pub mod parser;
pub mod record;
pub mod transform;

pub use emitter::{emit_json, emit_record, emit_records};
pub use error::FormError;
pub use export::{
    DuplicateIdPolicy, ExportConfig, export_document, export_multipage, export_records,
    normalize_document,
};
pub use icons::{IconCategory, IconSuggestion, suggest_icons};
pub use id::{TaskId, to_id};
pub use lint::{LintDiagnostic, LintSeverity, lint_multipage, lint_tasks};
pub use model::*;
pub use pages::{FormNode, MultiPageDocument, PageNode};
pub use palette::{PaletteItem, palette_items};
pub use parser::{parse_document, parse_records, parse_value};
pub use record::{FieldRecord, SchemaEntry};
