//! Multi-page documents: Form → Pages → Questions as an explicit tree.
//!
//! The designer's flat `[FormElement, Page, Page, …]` task view is derived
//! from the tree (`to_tasks`) and can be folded back into it (`from_tasks`).

use crate::error::FormError;
use crate::id::TaskId;
use crate::model::*;
use crate::parser::RecordFields;
use serde::Serialize;
use serde_json::Value;

/// A page and the questions it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub id: TaskId,
    pub title: String,
    pub questions: Vec<Question>,
}

impl PageNode {
    pub fn question(&self, id: TaskId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    fn question_index(&self, id: TaskId) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }
}

/// A form root and its pages.
#[derive(Debug, Clone, PartialEq)]
pub struct FormNode {
    pub id: TaskId,
    pub meta: FormMeta,
    pub pages: Vec<PageNode>,
}

/// The multi-page document.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPageDocument {
    pub forms: Vec<FormNode>,
    /// Number given to the next default "Page N" title. Never reused.
    next_page_number: u32,
}

impl Default for MultiPageDocument {
    fn default() -> Self {
        Self {
            forms: Vec::new(),
            next_page_number: 1,
        }
    }
}

impl MultiPageDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_forms(forms: Vec<FormNode>) -> Self {
        let page_count = forms.iter().map(|f| f.pages.len()).sum::<usize>();
        Self {
            forms,
            next_page_number: u32::try_from(page_count).map_or(u32::MAX, |n| n.saturating_add(1)),
        }
    }

    pub fn next_page_number(&self) -> u32 {
        self.next_page_number
    }

    pub fn has_form(&self) -> bool {
        !self.forms.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Every page of every form, in document order.
    pub fn pages(&self) -> impl Iterator<Item = &PageNode> {
        self.forms.iter().flat_map(|f| f.pages.iter())
    }

    pub fn page(&self, id: TaskId) -> Option<&PageNode> {
        self.pages().find(|p| p.id == id)
    }

    fn page_mut(&mut self, id: TaskId) -> Option<&mut PageNode> {
        self.forms
            .iter_mut()
            .flat_map(|f| f.pages.iter_mut())
            .find(|p| p.id == id)
    }

    /// `(form index, page index)` of a page.
    fn locate_page(&self, id: TaskId) -> Option<(usize, usize)> {
        self.forms.iter().enumerate().find_map(|(fi, form)| {
            form.pages
                .iter()
                .position(|p| p.id == id)
                .map(|pi| (fi, pi))
        })
    }

    // ─── Structural operations ───────────────────────────────────────────

    /// Create the form root. Only one form may exist.
    ///
    /// # Errors
    /// `FormError::FormElementExists` if a form is already present.
    pub fn create_form(&mut self) -> Result<TaskId, FormError> {
        if self.has_form() {
            return Err(FormError::FormElementExists);
        }
        let id = TaskId::fresh();
        self.forms.push(FormNode {
            id,
            meta: FormMeta::untitled(),
            pages: Vec::new(),
        });
        log::debug!("created form {id}");
        Ok(id)
    }

    /// Apply an edit to a form's metadata (`label` is the form name).
    ///
    /// # Errors
    /// `FormError::TaskNotFound` if no form has this id.
    pub fn update_form(&mut self, id: TaskId, patch: &TaskPatch) -> Result<(), FormError> {
        let form = self
            .forms
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FormError::TaskNotFound(id.to_string()))?;
        let mut task = Task::new(form.id, FieldKind::FormElement(form.meta.clone()));
        task.apply_patch(patch);
        form.id = task.id;
        if let FieldKind::FormElement(meta) = task.kind {
            form.meta = meta;
        }
        Ok(())
    }

    /// Append a page titled "Page N" to the last form.
    ///
    /// # Errors
    /// `FormError::NoFormElement` if there is no form to attach to.
    pub fn add_page(&mut self) -> Result<TaskId, FormError> {
        let number = self.next_page_number;
        let form = self.forms.last_mut().ok_or(FormError::NoFormElement)?;
        let id = TaskId::fresh();
        form.pages.push(PageNode {
            id,
            title: format!("Page {number}"),
            questions: Vec::new(),
        });
        self.next_page_number = number.saturating_add(1);
        log::debug!("added page {id} (Page {number})");
        Ok(id)
    }

    /// Append an untitled question to a page.
    ///
    /// # Errors
    /// `FormError::PageNotFound` if the page does not exist.
    pub fn add_question(&mut self, page_id: TaskId) -> Result<TaskId, FormError> {
        let page = self
            .page_mut(page_id)
            .ok_or_else(|| FormError::PageNotFound(page_id.to_string()))?;
        let question = Question::untitled();
        let id = question.id;
        page.questions.push(question);
        Ok(id)
    }

    /// # Errors
    /// `FormError::PageNotFound` if the page does not exist.
    pub fn update_page_title(&mut self, page_id: TaskId, title: &str) -> Result<(), FormError> {
        let page = self
            .page_mut(page_id)
            .ok_or_else(|| FormError::PageNotFound(page_id.to_string()))?;
        page.title = title.to_string();
        Ok(())
    }

    /// # Errors
    /// `FormError::PageNotFound` / `FormError::TaskNotFound` when the page or
    /// the question does not exist.
    pub fn update_question(
        &mut self,
        page_id: TaskId,
        question_id: TaskId,
        patch: &TaskPatch,
    ) -> Result<(), FormError> {
        let page = self
            .page_mut(page_id)
            .ok_or_else(|| FormError::PageNotFound(page_id.to_string()))?;
        let question = page
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| FormError::TaskNotFound(question_id.to_string()))?;
        question.apply_patch(patch);
        Ok(())
    }

    pub fn delete_page(&mut self, page_id: TaskId) -> Option<PageNode> {
        let (fi, pi) = self.locate_page(page_id)?;
        Some(self.forms[fi].pages.remove(pi))
    }

    pub fn delete_question(&mut self, page_id: TaskId, question_id: TaskId) -> Option<Question> {
        let page = self.page_mut(page_id)?;
        let index = page.question_index(question_id)?;
        Some(page.questions.remove(index))
    }

    /// Swap a page with its predecessor. Returns false at the top or when
    /// the page is unknown.
    pub fn move_page_up(&mut self, page_id: TaskId) -> bool {
        match self.locate_page(page_id) {
            Some((fi, pi)) if pi > 0 => {
                self.forms[fi].pages.swap(pi, pi - 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_page_down(&mut self, page_id: TaskId) -> bool {
        match self.locate_page(page_id) {
            Some((fi, pi)) if pi + 1 < self.forms[fi].pages.len() => {
                self.forms[fi].pages.swap(pi, pi + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap a question with its predecessor inside its own page.
    pub fn move_question_up(&mut self, page_id: TaskId, question_id: TaskId) -> bool {
        let Some(page) = self.page_mut(page_id) else {
            return false;
        };
        match page.question_index(question_id) {
            Some(i) if i > 0 => {
                page.questions.swap(i, i - 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_question_down(&mut self, page_id: TaskId, question_id: TaskId) -> bool {
        let Some(page) = self.page_mut(page_id) else {
            return false;
        };
        match page.question_index(question_id) {
            Some(i) if i + 1 < page.questions.len() => {
                page.questions.swap(i, i + 1);
                true
            }
            _ => false,
        }
    }

    /// Drop every form. The page counter restarts.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ─── Flat task view ──────────────────────────────────────────────────

    /// Fold a flat `[FormElement, Page, …]` task list into a tree. Pages that
    /// appear before any FormElement have no form to attach to and are
    /// dropped with a warning; other task types are ignored.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut forms: Vec<FormNode> = Vec::new();
        for task in tasks {
            match &task.kind {
                FieldKind::FormElement(meta) => forms.push(FormNode {
                    id: task.id,
                    meta: meta.clone(),
                    pages: Vec::new(),
                }),
                FieldKind::Page { title, questions } => match forms.last_mut() {
                    Some(form) => form.pages.push(PageNode {
                        id: task.id,
                        title: title.clone(),
                        questions: questions.iter().cloned().map(Question::with_defaults).collect(),
                    }),
                    None => log::warn!("dropping page {} that precedes any form", task.id),
                },
                _ => log::debug!("ignoring {:?} task {} in multi-page view", task.field_type(), task.id),
            }
        }
        Self::with_forms(forms)
    }

    /// Flatten the tree into `[FormElement, Page, Page, …, FormElement, …]`.
    #[must_use]
    pub fn to_tasks(&self) -> Vec<Task> {
        let mut tasks = Vec::new();
        for form in &self.forms {
            tasks.push(Task::new(form.id, FieldKind::FormElement(form.meta.clone())));
            for page in &form.pages {
                tasks.push(Task::new(
                    page.id,
                    FieldKind::Page {
                        title: page.title.clone(),
                        questions: page.questions.clone(),
                    },
                ));
            }
        }
        tasks
    }

    // ─── Canonical JSON ──────────────────────────────────────────────────

    /// Parse the canonical multi-page JSON.
    ///
    /// # Errors
    /// `FormError::Json` for invalid JSON, `FormError::NotAnArray` when the
    /// top level is not an array.
    pub fn from_json(input: &str) -> Result<Self, FormError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// # Errors
    /// `FormError::NotAnArray` when `value` is not an array.
    pub fn from_value(value: &Value) -> Result<Self, FormError> {
        let Value::Array(records) = value else {
            return Err(FormError::NotAnArray);
        };
        let forms = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let form = parse_form(record);
                if form.is_none() {
                    log::warn!("dropping multi-page record #{index}: not a FormElement");
                }
                form
            })
            .collect();
        Ok(Self::with_forms(forms))
    }

    /// Canonical records, borrowing from the document.
    pub fn to_records(&self) -> Vec<FormRecord<'_>> {
        self.forms.iter().map(FormRecord::from).collect()
    }

    /// # Errors
    /// Only if `serde_json` fails to serialize the records.
    pub fn to_json(&self, pretty: bool) -> Result<String, FormError> {
        let records = self.to_records();
        Ok(if pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        })
    }
}

impl Question {
    /// Fill the question's absent attributes (`icon` → "person").
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        if self.icon.is_empty() {
            self.icon = DEFAULT_QUESTION_ICON.into();
        }
        self
    }

    /// Apply an edit-dialog save: id (when non-blank), label, icon, required.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(id) = patch.id.as_deref().map(str::trim)
            && !id.is_empty()
        {
            self.id = TaskId::intern(id);
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = icon.clone();
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
    }
}

fn parse_form(record: &Value) -> Option<FormNode> {
    let fields = RecordFields::of(record)?;
    if fields.text("type") != FieldType::FormElement.as_str() {
        return None;
    }
    let pages = fields
        .array("pages")
        .iter()
        .enumerate()
        .filter_map(|(index, page)| {
            let node = parse_page(page);
            if node.is_none() {
                log::warn!("dropping page #{index}: not a Page record");
            }
            node
        })
        .collect();
    Some(FormNode {
        id: fields.id(),
        meta: FormMeta {
            form_name: fields.text_or("formName", "Untitled Form"),
            form_subtitle: fields.text("formSubtitle"),
            form_style: fields.text_or("formStyle", "A"),
            form_icon: fields.text("formIcon"),
            form_identifier: fields
                .non_empty("formIdentifier")
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        },
        pages,
    })
}

fn parse_page(record: &Value) -> Option<PageNode> {
    let fields = RecordFields::of(record)?;
    if let Some(ty) = fields.non_empty("type")
        && ty != FieldType::Page.as_str()
    {
        return None;
    }
    Some(PageNode {
        id: fields.id(),
        title: fields.text("pageTitle"),
        questions: fields.array("questions").iter().filter_map(parse_question).collect(),
    })
}

fn parse_question(record: &Value) -> Option<Question> {
    let Some(fields) = RecordFields::of(record) else {
        log::warn!("dropping question: not an object");
        return None;
    };
    Some(Question {
        id: fields.id(),
        label: fields.text("label"),
        icon: fields.text_or("icon", DEFAULT_QUESTION_ICON),
        required: fields.flag("required"),
    })
}

// ─── Records ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub form_name: &'a str,
    pub form_subtitle: &'a str,
    pub pages: Vec<PageRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub page_title: &'a str,
    pub questions: Vec<QuestionRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct QuestionRecord<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub icon: &'a str,
    pub required: bool,
    #[serde(rename = "type")]
    pub type_name: &'static str,
}

impl<'a> From<&'a FormNode> for FormRecord<'a> {
    fn from(form: &'a FormNode) -> Self {
        Self {
            id: form.id.as_str(),
            type_name: FieldType::FormElement.as_str(),
            form_name: &form.meta.form_name,
            form_subtitle: &form.meta.form_subtitle,
            pages: form.pages.iter().map(PageRecord::from).collect(),
        }
    }
}

impl<'a> From<&'a PageNode> for PageRecord<'a> {
    fn from(page: &'a PageNode) -> Self {
        Self {
            id: page.id.as_str(),
            type_name: FieldType::Page.as_str(),
            page_title: &page.title,
            questions: page.questions.iter().map(QuestionRecord::from).collect(),
        }
    }
}

impl<'a> From<&'a Question> for QuestionRecord<'a> {
    fn from(q: &'a Question) -> Self {
        Self {
            id: q.id.as_str(),
            label: &q.label,
            icon: if q.icon.is_empty() {
                DEFAULT_QUESTION_ICON
            } else {
                &q.icon
            },
            required: q.required,
            type_name: FieldType::Question.as_str(),
        }
    }
}
