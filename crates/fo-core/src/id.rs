use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for task ids: fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for tasks, pages and questions.
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
///
/// The empty string is a valid `TaskId`: it marks a field whose id will be
/// derived from its label at export time.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Spur);

impl TaskId {
    /// Intern a string as a TaskId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        TaskId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// A fresh random (UUID v4) id, used for drops and for records without an id.
    pub fn fresh() -> Self {
        Self::intern(&uuid::Uuid::new_v4().to_string())
    }

    /// True when the id is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::intern("")
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::intern(s)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TaskId::intern(&s))
    }
}

// ─── Identifier normalizer ───────────────────────────────────────────────

/// Build a camelCase identifier from a label, prefixed by `prefix`.
///
/// `to_id("checkbox", "Subscribe to Newsletter!")` → `checkboxSubscribeToNewsletter`.
/// An empty label yields `{prefix}Unknown`.
///
/// Only ASCII word characters (`[A-Za-z0-9_]`) and whitespace survive. The
/// prefix is the lowercase head of the camelCase id, so every label word gets
/// an uppercase first letter and keeps the rest of its casing.
#[must_use]
pub fn to_id(prefix: &str, text: &str) -> String {
    if text.is_empty() {
        return format!("{prefix}Unknown");
    }

    let stripped: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut id = String::with_capacity(prefix.len() + stripped.len());
    id.push_str(prefix);
    for word in stripped.split_whitespace() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            id.push(first.to_ascii_uppercase());
            id.push_str(chars.as_str());
        }
    }

    log::debug!("to_id: prefix='{prefix}', text='{text}' => '{id}'");
    id
}
