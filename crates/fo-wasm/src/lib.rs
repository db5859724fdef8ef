//! WASM bridge for FormOrbit: exposes the designer engines to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the browser
//! designer. Structured data crosses the boundary as JSON strings; failures
//! surface as JS `Error`s carrying the engine's message.

use fo_core::export::{ExportConfig, normalize_document};
use fo_core::lint::lint_tasks;
use fo_core::model::TaskPatch;
use fo_core::palette::palette_items;
use fo_core::parser::parse_document;
use fo_core::{FormError, TaskId};
use fo_editor::commands::CommandStack;
use fo_editor::designer::{Designer, DesignerConfig, TaskMutation};
use fo_editor::drag::{DragController, DropZone};
use fo_editor::loader::LoadTicket;
use fo_editor::multipage::{MultiPageDesigner, PageDropTarget, PageMutation};
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn parse_config(config_json: Option<String>) -> Result<DesignerConfig, FormError> {
    match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => Ok(serde_json::from_str(json)?),
        _ => Ok(DesignerConfig::default()),
    }
}

fn parse_patch(patch_json: &str) -> Result<TaskPatch, FormError> {
    Ok(serde_json::from_str(patch_json)?)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

// ─── Single-page designer ────────────────────────────────────────────────

/// The single-page form designer.
///
/// Holds the designer, command stack, and drag engine. All interaction from
/// the page's JS goes through this struct.
#[wasm_bindgen]
pub struct FormDesigner {
    designer: Designer,
    commands: CommandStack<Designer>,
    drag: DragController,
}

#[wasm_bindgen]
impl FormDesigner {
    /// Create a designer. `config_json` is an optional `DesignerConfig`
    /// object (`{"undoDepth":200,"export":{...}}`).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FormDesigner, JsValue> {
        console_error_panic_hook_setup();
        let config = parse_config(config_json).map_err(js_error)?;
        let commands = CommandStack::new(config.undo_depth);
        Ok(Self {
            designer: Designer::new(config),
            commands,
            drag: DragController::new(),
        })
    }

    /// The "Form Components" templates as a JSON array of tasks, each with
    /// its display `glyph`.
    pub fn palette_json(&self) -> String {
        to_json(&palette_items(self.designer.palette()))
    }

    /// The "Form Structure" tasks in display order.
    pub fn canvas_json(&self) -> String {
        let canvas: Vec<_> = self.designer.canvas().collect();
        to_json(&canvas)
    }

    /// "Create Form". Returns the new form element's id.
    pub fn create_form(&mut self) -> Result<String, JsValue> {
        self.commands
            .execute(&mut self.designer, TaskMutation::CreateForm, "Create form")
            .map_err(js_error)?;
        self.designer
            .canvas()
            .find(|t| t.is_form_element())
            .map(|t| t.id.as_str().to_string())
            .ok_or_else(|| js_error(FormError::NoFormElement))
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    /// Start dragging a template (`from_palette`) or a canvas task.
    pub fn drag_start(&mut self, id: &str, from_palette: bool) -> bool {
        let zone = if from_palette { DropZone::Palette } else { DropZone::Canvas };
        self.drag.drag_start(self.designer.tasks(), zone, TaskId::intern(id))
    }

    pub fn drag_enter(&mut self, id: &str) {
        self.drag.drag_enter(TaskId::intern(id));
    }

    pub fn drag_end(&mut self) {
        self.drag.drag_end();
    }

    /// Drop onto "Form Structure". Returns true if the canvas changed.
    pub fn drop_on_canvas(&mut self) -> Result<bool, JsValue> {
        let outcome = self.drag.drop(DropZone::Canvas, self.designer.tasks());
        let Some(mutation) = outcome.into_mutation() else {
            return Ok(false);
        };
        let description = match &mutation {
            TaskMutation::Insert { .. } => "Add field",
            _ => "Reorder",
        };
        self.commands
            .execute(&mut self.designer, mutation, description)
            .map_err(js_error)
    }

    /// Drop onto "Form Components". Never changes anything.
    pub fn drop_on_palette(&mut self) -> bool {
        self.drag.drop(DropZone::Palette, self.designer.tasks());
        false
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn move_up(&mut self, id: &str) -> bool {
        self.move_adjacent(id, true)
    }

    pub fn move_down(&mut self, id: &str) -> bool {
        self.move_adjacent(id, false)
    }

    fn move_adjacent(&mut self, id: &str, up: bool) -> bool {
        let Some(mutation) = self.designer.adjacent_move(TaskId::intern(id), up) else {
            return false;
        };
        self.commands
            .execute(&mut self.designer, mutation, "Move field")
            .unwrap_or(false)
    }

    /// Apply an edit dialog's save. `patch_json` is a `TaskPatch` object.
    pub fn update_task(&mut self, id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let patch = parse_patch(patch_json).map_err(js_error)?;
        self.commands
            .execute(
                &mut self.designer,
                TaskMutation::Patch {
                    id: TaskId::intern(id),
                    patch: Box::new(patch),
                },
                "Edit field",
            )
            .map_err(js_error)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<bool, JsValue> {
        self.commands
            .execute(
                &mut self.designer,
                TaskMutation::Delete {
                    id: TaskId::intern(id),
                },
                "Delete field",
            )
            .map_err(js_error)
    }

    pub fn clear_canvas(&mut self) -> bool {
        self.commands
            .execute(&mut self.designer, TaskMutation::ClearCanvas, "Clear form")
            .unwrap_or(false)
    }

    pub fn undo(&mut self) -> bool {
        self.commands.undo(&mut self.designer).is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.commands.redo(&mut self.designer).is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    // ─── Load / export ───────────────────────────────────────────────────

    /// Replace the canvas with a canonical JSON document. Undoable.
    /// Returns the number of loaded tasks.
    pub fn load_json(&mut self, json: &str) -> Result<usize, JsValue> {
        let tasks = parse_document(json).map_err(js_error)?;
        let count = tasks.len();
        self.commands
            .execute(
                &mut self.designer,
                TaskMutation::ReplaceCanvas { tasks },
                "Load form",
            )
            .map_err(js_error)?;
        Ok(count)
    }

    /// Start a template fetch. Pass the ticket back to `finish_load`.
    pub fn begin_load(&mut self) -> u64 {
        self.designer.begin_load().get()
    }

    /// Install a fetched template, unless a newer load has been started.
    pub fn finish_load(&mut self, ticket: u64, json: &str) -> Result<usize, JsValue> {
        let mutation = self
            .designer
            .prepare_load(LoadTicket::from_raw(ticket), json)
            .map_err(js_error)?;
        self.commands
            .execute(&mut self.designer, mutation, "Load template")
            .map_err(js_error)?;
        Ok(self.designer.tasks().canvas_len())
    }

    /// The canonical JSON the renderer consumes.
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.designer.export_json().map_err(js_error)
    }

    /// Lint diagnostics as a JSON array.
    pub fn lint_json(&self) -> String {
        to_json(&self.designer.lint())
    }
}

// ─── Multi-page designer ─────────────────────────────────────────────────

/// The Form → Pages → Questions designer.
#[wasm_bindgen]
pub struct PagesDesigner {
    designer: MultiPageDesigner,
    commands: CommandStack<MultiPageDesigner>,
}

#[wasm_bindgen]
impl PagesDesigner {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PagesDesigner, JsValue> {
        console_error_panic_hook_setup();
        let config = parse_config(config_json).map_err(js_error)?;
        let commands = CommandStack::new(config.undo_depth);
        Ok(Self {
            designer: MultiPageDesigner::new(config),
            commands,
        })
    }

    pub fn palette_json(&self) -> String {
        to_json(&palette_items(self.designer.palette()))
    }

    /// The flat `[FormElement, Page, …]` list for the structure column.
    pub fn tasks_json(&self) -> String {
        to_json(&self.designer.tasks())
    }

    /// Questions of one page as a JSON array.
    pub fn questions_json(&self, page_id: &str) -> String {
        match self.designer.document().page(TaskId::intern(page_id)) {
            Some(page) => to_json(&page.questions),
            None => "[]".to_string(),
        }
    }

    fn run(&mut self, mutation: PageMutation, description: &str) -> Result<bool, JsValue> {
        self.commands
            .execute(&mut self.designer, mutation, description)
            .map_err(js_error)
    }

    pub fn create_form(&mut self) -> Result<bool, JsValue> {
        self.run(PageMutation::CreateForm, "Create form")
    }

    pub fn update_form(&mut self, id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let patch = parse_patch(patch_json).map_err(js_error)?;
        self.run(
            PageMutation::UpdateForm {
                id: TaskId::intern(id),
                patch: Box::new(patch),
            },
            "Edit form",
        )
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    pub fn drag_start(&mut self, template_id: &str) -> bool {
        self.designer.drag_start(TaskId::intern(template_id))
    }

    pub fn drag_end(&mut self) {
        self.designer.drag_end();
    }

    /// Drop onto the page column. Only page templates are accepted.
    pub fn drop_on_page_column(&mut self) -> Result<bool, JsValue> {
        match self.designer.drop(PageDropTarget::PageColumn) {
            Some(mutation) => self.run(mutation, "Add page"),
            None => Ok(false),
        }
    }

    /// Drop onto one page. Only question templates are accepted.
    pub fn drop_on_page(&mut self, page_id: &str) -> Result<bool, JsValue> {
        match self.designer.drop(PageDropTarget::Page(TaskId::intern(page_id))) {
            Some(mutation) => self.run(mutation, "Add question"),
            None => Ok(false),
        }
    }

    pub fn drop_on_palette(&mut self) -> bool {
        self.designer.drop(PageDropTarget::Palette);
        false
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn update_page_title(&mut self, page_id: &str, title: &str) -> Result<bool, JsValue> {
        self.run(
            PageMutation::UpdatePageTitle {
                page: TaskId::intern(page_id),
                title: title.to_string(),
            },
            "Rename page",
        )
    }

    pub fn update_question(
        &mut self,
        page_id: &str,
        question_id: &str,
        patch_json: &str,
    ) -> Result<bool, JsValue> {
        let patch = parse_patch(patch_json).map_err(js_error)?;
        self.run(
            PageMutation::UpdateQuestion {
                page: TaskId::intern(page_id),
                question: TaskId::intern(question_id),
                patch: Box::new(patch),
            },
            "Edit question",
        )
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<bool, JsValue> {
        self.run(
            PageMutation::DeletePage {
                page: TaskId::intern(page_id),
            },
            "Delete page",
        )
    }

    pub fn delete_question(&mut self, page_id: &str, question_id: &str) -> Result<bool, JsValue> {
        self.run(
            PageMutation::DeleteQuestion {
                page: TaskId::intern(page_id),
                question: TaskId::intern(question_id),
            },
            "Delete question",
        )
    }

    pub fn move_page(&mut self, page_id: &str, up: bool) -> Result<bool, JsValue> {
        let page = TaskId::intern(page_id);
        let mutation = if up {
            PageMutation::MovePageUp { page }
        } else {
            PageMutation::MovePageDown { page }
        };
        self.run(mutation, "Move page")
    }

    pub fn move_question(
        &mut self,
        page_id: &str,
        question_id: &str,
        up: bool,
    ) -> Result<bool, JsValue> {
        let page = TaskId::intern(page_id);
        let question = TaskId::intern(question_id);
        let mutation = if up {
            PageMutation::MoveQuestionUp { page, question }
        } else {
            PageMutation::MoveQuestionDown { page, question }
        };
        self.run(mutation, "Move question")
    }

    pub fn clear(&mut self) -> Result<bool, JsValue> {
        self.run(PageMutation::Clear, "Clear form")
    }

    pub fn undo(&mut self) -> bool {
        self.commands.undo(&mut self.designer).is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.commands.redo(&mut self.designer).is_some()
    }

    // ─── Load / export ───────────────────────────────────────────────────

    pub fn begin_load(&mut self) -> u64 {
        self.designer.begin_load().get()
    }

    pub fn finish_load(&mut self, ticket: u64, json: &str) -> Result<bool, JsValue> {
        let mutation = self
            .designer
            .prepare_load(LoadTicket::from_raw(ticket), json)
            .map_err(js_error)?;
        self.run(mutation, "Load template")
    }

    pub fn export_json(&self) -> Result<String, JsValue> {
        self.designer.export_json().map_err(js_error)
    }

    pub fn lint_json(&self) -> String {
        to_json(&self.designer.lint())
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FormOrbit WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no designer needed) ───────────────────────────

/// Derive a field id from a prefix and label, e.g. `("id", "Email Address")`
/// → `idEmailAddress`.
#[wasm_bindgen]
pub fn to_id(prefix: &str, text: &str) -> String {
    fo_core::to_id(prefix, text)
}

/// Icon suggestions for a label as `{"category":"...","icons":[...]}`.
#[wasm_bindgen]
pub fn suggest_icons(label: &str) -> String {
    to_json(&fo_core::suggest_icons(label))
}

fn error_json(err: &FormError) -> String {
    serde_json::json!({ "ok": false, "error": err.to_string() }).to_string()
}

/// Validate a canonical form document. Returns JSON:
/// `{"ok":true,"count":N,"diagnostics":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_schema(json: &str) -> String {
    match parse_document(json) {
        Ok(tasks) => serde_json::json!({
            "ok": true,
            "count": tasks.len(),
            "diagnostics": lint_tasks(&tasks),
        })
        .to_string(),
        Err(e) => error_json(&e),
    }
}

/// Re-export a canonical document with ids resolved. `config_json` is an
/// optional `ExportConfig`. Returns `{"ok":true,"json":"..."}` or an error
/// object.
#[wasm_bindgen]
pub fn normalize_schema(json: &str, config_json: Option<String>) -> String {
    let config = match config_json.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match serde_json::from_str::<ExportConfig>(raw) {
            Ok(config) => config,
            Err(e) => return error_json(&FormError::from(e)),
        },
        _ => ExportConfig::default(),
    };
    match normalize_document(json, &config) {
        Ok(normalized) => serde_json::json!({ "ok": true, "json": normalized }).to_string(),
        Err(e) => {
            log::warn!("normalize_schema failed: {e}");
            error_json(&e)
        }
    }
}
