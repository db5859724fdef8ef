//! Multi-page designer: Form → Pages → Questions.
//!
//! Structure lives in a `MultiPageDocument` tree. The palette holds two
//! templates: a page, accepted by the page column, and a question, accepted
//! only by a specific page's drop target.

use crate::commands::Editable;
use crate::designer::DesignerConfig;
use crate::loader::{LoadTicket, LoadTracker};
use fo_core::export::export_multipage;
use fo_core::lint::{LintDiagnostic, lint_multipage};
use fo_core::model::{FieldType, Task, TaskPatch};
use fo_core::palette::page_palette;
use fo_core::{FormError, MultiPageDocument, TaskId};

/// A single change to the multi-page document.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMutation {
    CreateForm,
    UpdateForm { id: TaskId, patch: Box<TaskPatch> },
    AddPage,
    AddQuestion { page: TaskId },
    UpdatePageTitle { page: TaskId, title: String },
    UpdateQuestion { page: TaskId, question: TaskId, patch: Box<TaskPatch> },
    DeletePage { page: TaskId },
    DeleteQuestion { page: TaskId, question: TaskId },
    MovePageUp { page: TaskId },
    MovePageDown { page: TaskId },
    MoveQuestionUp { page: TaskId, question: TaskId },
    MoveQuestionDown { page: TaskId, question: TaskId },
    Replace { document: Box<MultiPageDocument> },
    Clear,
}

/// Drop targets of the multi-page designer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDropTarget {
    /// The page column ("Form Structure").
    PageColumn,
    /// One page's question area.
    Page(TaskId),
    /// The template column.
    Palette,
}

#[derive(Debug, Clone)]
pub struct MultiPageDesigner {
    document: MultiPageDocument,
    palette: Vec<Task>,
    dragged: Option<FieldType>,
    config: DesignerConfig,
    loads: LoadTracker,
}

impl Default for MultiPageDesigner {
    fn default() -> Self {
        Self::new(DesignerConfig::default())
    }
}

impl MultiPageDesigner {
    pub fn new(config: DesignerConfig) -> Self {
        Self {
            document: MultiPageDocument::new(),
            palette: page_palette(),
            dragged: None,
            config,
            loads: LoadTracker::new(),
        }
    }

    pub fn document(&self) -> &MultiPageDocument {
        &self.document
    }

    pub fn palette(&self) -> &[Task] {
        &self.palette
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Apply a mutation. Returns whether the document changed.
    ///
    /// # Errors
    /// `FormElementExists`, `NoFormElement`, `PageNotFound` or `TaskNotFound`
    /// from the document; the document is unchanged on error. `Replace` and
    /// `Clear` supersede any load still in flight.
    pub fn apply_mutation(&mut self, mutation: PageMutation) -> Result<bool, FormError> {
        log::debug!("apply {mutation:?}");
        if matches!(mutation, PageMutation::Replace { .. } | PageMutation::Clear) {
            self.loads.invalidate();
        }
        let doc = &mut self.document;
        Ok(match mutation {
            PageMutation::CreateForm => doc.create_form().map(|_| true)?,
            PageMutation::UpdateForm { id, patch } => doc.update_form(id, &patch).map(|()| true)?,
            PageMutation::AddPage => doc.add_page().map(|_| true)?,
            PageMutation::AddQuestion { page } => doc.add_question(page).map(|_| true)?,
            PageMutation::UpdatePageTitle { page, title } => {
                doc.update_page_title(page, &title).map(|()| true)?
            }
            PageMutation::UpdateQuestion {
                page,
                question,
                patch,
            } => doc.update_question(page, question, &patch).map(|()| true)?,
            PageMutation::DeletePage { page } => doc.delete_page(page).is_some(),
            PageMutation::DeleteQuestion { page, question } => {
                doc.delete_question(page, question).is_some()
            }
            PageMutation::MovePageUp { page } => doc.move_page_up(page),
            PageMutation::MovePageDown { page } => doc.move_page_down(page),
            PageMutation::MoveQuestionUp { page, question } => doc.move_question_up(page, question),
            PageMutation::MoveQuestionDown { page, question } => {
                doc.move_question_down(page, question)
            }
            PageMutation::Replace { document } => {
                *doc = *document;
                true
            }
            PageMutation::Clear => {
                let had_forms = doc.has_form();
                doc.clear();
                had_forms
            }
        })
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    /// Begin dragging a palette template. Returns false for anything that is
    /// not a page or question template.
    pub fn drag_start(&mut self, template: TaskId) -> bool {
        self.dragged = self
            .palette
            .iter()
            .find(|t| t.id == template)
            .map(Task::field_type)
            .filter(|ty| matches!(ty, FieldType::Page | FieldType::Question));
        self.dragged.is_some()
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
    }

    /// Resolve a drop into the mutation it stands for. Pages are accepted by
    /// the page column, questions only by a page; everything else is ignored.
    pub fn drop(&mut self, target: PageDropTarget) -> Option<PageMutation> {
        let dragged = self.dragged.take()?;
        match (dragged, target) {
            (FieldType::Page, PageDropTarget::PageColumn) => Some(PageMutation::AddPage),
            (FieldType::Question, PageDropTarget::Page(page)) if self.document.page(page).is_some() => {
                Some(PageMutation::AddQuestion { page })
            }
            _ => {
                log::debug!("ignoring {dragged:?} drop on {target:?}");
                None
            }
        }
    }

    // ─── Load / export ───────────────────────────────────────────────────

    /// # Errors
    /// Parse errors; the document is untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), FormError> {
        let document = MultiPageDocument::from_json(json)?;
        self.apply_mutation(PageMutation::Replace {
            document: Box::new(document),
        })?;
        Ok(())
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.issue()
    }

    /// # Errors
    /// `FormError::StaleLoad` for a superseded ticket, or a parse error.
    pub fn prepare_load(&self, ticket: LoadTicket, json: &str) -> Result<PageMutation, FormError> {
        self.loads.accept(ticket)?;
        let document = MultiPageDocument::from_json(json)?;
        Ok(PageMutation::Replace {
            document: Box::new(document),
        })
    }

    /// # Errors
    /// `FormError::DuplicateId` under the `Reject` policy.
    pub fn export_json(&self) -> Result<String, FormError> {
        export_multipage(&self.document, &self.config.export)
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_multipage(&self.document)
    }

    /// The flat `[FormElement, Page, …]` task view for list rendering.
    pub fn tasks(&self) -> Vec<Task> {
        self.document.to_tasks()
    }
}

impl Editable for MultiPageDesigner {
    type Mutation = PageMutation;
    type Snapshot = MultiPageDocument;

    fn apply_mutation(&mut self, mutation: PageMutation) -> Result<bool, FormError> {
        MultiPageDesigner::apply_mutation(self, mutation)
    }

    /// Only the swaps have exact inverses; everything else is snapshotted.
    fn inverse_of(&self, mutation: &PageMutation) -> Option<PageMutation> {
        match mutation {
            PageMutation::MovePageUp { page } => Some(PageMutation::MovePageDown { page: *page }),
            PageMutation::MovePageDown { page } => Some(PageMutation::MovePageUp { page: *page }),
            PageMutation::MoveQuestionUp { page, question } => Some(PageMutation::MoveQuestionDown {
                page: *page,
                question: *question,
            }),
            PageMutation::MoveQuestionDown { page, question } => Some(PageMutation::MoveQuestionUp {
                page: *page,
                question: *question,
            }),
            _ => None,
        }
    }

    fn snapshot(&self) -> MultiPageDocument {
        self.document.clone()
    }

    fn restore(&mut self, snapshot: MultiPageDocument) {
        self.document = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fo_core::palette::{PAGE_TEMPLATE_ID, QUESTION_TEMPLATE_ID};

    fn page_template() -> TaskId {
        TaskId::intern(PAGE_TEMPLATE_ID)
    }

    fn question_template() -> TaskId {
        TaskId::intern(QUESTION_TEMPLATE_ID)
    }

    #[test]
    fn page_drop_needs_page_column() {
        let mut designer = MultiPageDesigner::default();
        assert!(designer.drag_start(page_template()));
        assert_eq!(designer.drop(PageDropTarget::Palette), None);
        assert!(designer.drag_start(page_template()));
        assert_eq!(designer.drop(PageDropTarget::PageColumn), Some(PageMutation::AddPage));
    }

    #[test]
    fn add_page_without_form_fails() {
        let mut designer = MultiPageDesigner::default();
        assert!(matches!(
            designer.apply_mutation(PageMutation::AddPage),
            Err(FormError::NoFormElement)
        ));
    }

    #[test]
    fn question_drop_needs_existing_page() {
        let mut designer = MultiPageDesigner::default();
        designer.apply_mutation(PageMutation::CreateForm).unwrap();
        designer.apply_mutation(PageMutation::AddPage).unwrap();
        let page = designer.document().pages().next().unwrap().id;

        designer.drag_start(question_template());
        assert_eq!(designer.drop(PageDropTarget::PageColumn), None);
        designer.drag_start(question_template());
        assert_eq!(designer.drop(PageDropTarget::Page(TaskId::intern("nowhere"))), None);
        designer.drag_start(question_template());
        assert_eq!(
            designer.drop(PageDropTarget::Page(page)),
            Some(PageMutation::AddQuestion { page })
        );
    }

    #[test]
    fn clear_and_import_supersede_pending_load() {
        let mut designer = MultiPageDesigner::default();
        let pending = designer.begin_load();
        designer.apply_mutation(PageMutation::Clear).unwrap();
        designer
            .load_json(r#"[{"id": "imported", "type": "FormElement", "formName": "Imported"}]"#)
            .unwrap();

        let late = r#"[{"id": "old", "type": "FormElement", "formName": "Old"}]"#;
        assert!(matches!(
            designer.prepare_load(pending, late),
            Err(FormError::StaleLoad { .. })
        ));
        let fresh = designer.begin_load();
        assert!(designer.prepare_load(fresh, late).is_ok());
        assert_eq!(designer.tasks()[0].id.as_str(), "imported");
    }

    #[test]
    fn drop_without_drag_is_ignored() {
        let mut designer = MultiPageDesigner::default();
        assert_eq!(designer.drop(PageDropTarget::PageColumn), None);
        assert!(!designer.drag_start(TaskId::intern("template-text-element")));
    }
}
