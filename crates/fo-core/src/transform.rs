//! Id passes applied to a canvas snapshot before export.
//!
//! Each pass has a single responsibility and is safe to compose.
//! Passes are applied by `export_document` in `export.rs` based on `ExportConfig`.

use crate::error::FormError;
use crate::export::DuplicateIdPolicy;
use crate::id::TaskId;
use crate::model::Task;
use crate::pages::MultiPageDocument;
use std::collections::{HashMap, HashSet};

// ─── Resolve ids ─────────────────────────────────────────────────────────

/// Write label-derived ids back into tasks whose id is blank.
///
/// Radio and FormElement have no derivation prefix and are left alone.
/// Returns the number of tasks that changed.
pub fn resolve_ids(tasks: &mut [Task]) -> usize {
    let mut changed = 0;
    for task in tasks.iter_mut().filter(|t| t.id.is_blank()) {
        let resolved = task.resolved_id();
        if !resolved.trim().is_empty() {
            task.id = TaskId::intern(&resolved);
            changed += 1;
        }
    }
    changed
}

// ─── Duplicate ids ───────────────────────────────────────────────────────

/// Export ids (after derivation) that occur more than once, in first-seen
/// order. Blank ids are not considered.
#[must_use]
pub fn duplicate_ids<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order = Vec::new();
    for id in tasks.into_iter().map(Task::resolved_id) {
        if id.trim().is_empty() {
            continue;
        }
        let count = counts.entry(id.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(id);
        }
    }
    order
}

/// Enforce id uniqueness over `tasks` according to `policy`.
///
/// `AutoSuffix` renames every repeat occurrence to the first free
/// `{id}2`, `{id}3`, …; the first occurrence keeps its id.
///
/// # Errors
/// `FormError::DuplicateId` under `DuplicateIdPolicy::Reject`.
pub fn apply_duplicate_policy(
    tasks: &mut [Task],
    policy: DuplicateIdPolicy,
) -> Result<usize, FormError> {
    let ids: Vec<String> = tasks.iter().map(Task::resolved_id).collect();
    let renames = plan_renames(&ids, policy)?;
    for (index, id) in &renames {
        tasks[*index].id = TaskId::intern(id);
    }
    Ok(renames.len())
}

/// Same as [`apply_duplicate_policy`] over every form, page and question id
/// of a multi-page document.
///
/// # Errors
/// `FormError::DuplicateId` under `DuplicateIdPolicy::Reject`.
pub fn apply_duplicate_policy_multipage(
    doc: &mut MultiPageDocument,
    policy: DuplicateIdPolicy,
) -> Result<usize, FormError> {
    let mut slots: Vec<&mut TaskId> = Vec::new();
    for form in &mut doc.forms {
        slots.push(&mut form.id);
        for page in &mut form.pages {
            slots.push(&mut page.id);
            slots.extend(page.questions.iter_mut().map(|q| &mut q.id));
        }
    }
    let ids: Vec<String> = slots.iter().map(|id| id.as_str().to_string()).collect();
    let renames = plan_renames(&ids, policy)?;
    for (index, id) in &renames {
        *slots[*index] = TaskId::intern(id);
    }
    Ok(renames.len())
}

/// Decide which positions must be renamed, and to what.
fn plan_renames(
    ids: &[String],
    policy: DuplicateIdPolicy,
) -> Result<Vec<(usize, String)>, FormError> {
    let mut taken: HashSet<String> = ids.iter().cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut renames = Vec::new();

    for (index, id) in ids.iter().enumerate() {
        if id.trim().is_empty() || seen.insert(id.as_str()) {
            continue;
        }
        match policy {
            DuplicateIdPolicy::Keep => log::warn!("duplicate id '{id}' kept as-is"),
            DuplicateIdPolicy::Reject => return Err(FormError::DuplicateId(id.clone())),
            DuplicateIdPolicy::AutoSuffix => {
                let candidate = (2u32..)
                    .map(|n| format!("{id}{n}"))
                    .find(|c| !taken.contains(c))
                    .unwrap_or_else(|| TaskId::fresh().to_string());
                log::warn!("duplicate id '{id}' renamed to '{candidate}'");
                taken.insert(candidate.clone());
                renames.push((index, candidate));
            }
        }
    }
    Ok(renames)
}

// ─── Tests ───────────────────────────────────────────────────────────────
