//! Undo/Redo command stack.
//!
//! Every mutation is wrapped in a reversible `Command` that can be undone.
//! Commands are pushed to a stack; undo pops and applies the inverse.
//!
//! Mutations without a cheap inverse (patches, loads, clears, anything that
//! generates fresh ids) use **snapshot commands**: the editable state is
//! captured before and after, and undo/redo swaps the whole snapshot in a
//! single step.

use fo_core::FormError;
use std::fmt::Debug;

/// State that the command stack can drive: designers for single-page and
/// multi-page forms.
pub trait Editable {
    type Mutation: Clone + Debug;
    type Snapshot: Clone + PartialEq + Debug;

    /// Apply a mutation. Returns whether anything changed.
    fn apply_mutation(&mut self, mutation: Self::Mutation) -> Result<bool, FormError>;

    /// The mutation that undoes `mutation` against the current state, when
    /// one exists.
    fn inverse_of(&self, mutation: &Self::Mutation) -> Option<Self::Mutation>;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// A command that captures both a forward mutation and its inverse, or a
/// before/after snapshot.
#[derive(Debug)]
pub enum Command<E: Editable> {
    /// Single mutation with its inverse.
    Single {
        forward: E::Mutation,
        inverse: E::Mutation,
        description: String,
    },
    /// Snapshot-based: full state before and after.
    Snapshot {
        before: E::Snapshot,
        after: E::Snapshot,
        description: String,
    },
}

impl<E: Editable> Command<E> {
    pub fn description(&self) -> &str {
        match self {
            Command::Single { description, .. } | Command::Snapshot { description, .. } => {
                description
            }
        }
    }
}

/// Manages undo/redo stacks.
#[derive(Debug)]
pub struct CommandStack<E: Editable> {
    undo_stack: Vec<Command<E>>,
    redo_stack: Vec<Command<E>>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl<E: Editable> CommandStack<E> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Apply a mutation and push it to the undo stack.
    ///
    /// Failed mutations leave the state untouched and push nothing. So do
    /// mutations that change nothing.
    ///
    /// # Errors
    /// Whatever `apply_mutation` reports.
    pub fn execute(
        &mut self,
        target: &mut E,
        mutation: E::Mutation,
        description: &str,
    ) -> Result<bool, FormError> {
        let cmd = match target.inverse_of(&mutation) {
            Some(inverse) => {
                if !target.apply_mutation(mutation.clone())? {
                    return Ok(false);
                }
                Command::Single {
                    forward: mutation,
                    inverse,
                    description: description.to_string(),
                }
            }
            None => {
                let before = target.snapshot();
                if !target.apply_mutation(mutation)? {
                    return Ok(false);
                }
                let after = target.snapshot();
                if before == after {
                    return Ok(false);
                }
                Command::Snapshot {
                    before,
                    after,
                    description: description.to_string(),
                }
            }
        };

        log::debug!("execute: {description}");
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }

        // Clear redo stack on new action
        self.redo_stack.clear();
        Ok(true)
    }

    /// Undo the last command. Returns its description.
    pub fn undo(&mut self, target: &mut E) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        match &cmd {
            Command::Single { inverse, .. } => {
                if let Err(err) = target.apply_mutation(inverse.clone()) {
                    log::warn!("undo of '{}' failed: {err}", cmd.description());
                }
            }
            Command::Snapshot { before, .. } => target.restore(before.clone()),
        }
        let desc = cmd.description().to_string();
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone command.
    pub fn redo(&mut self, target: &mut E) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        match &cmd {
            Command::Single { forward, .. } => {
                if let Err(err) = target.apply_mutation(forward.clone()) {
                    log::warn!("redo of '{}' failed: {err}", cmd.description());
                }
            }
            Command::Snapshot { after, .. } => target.restore(after.clone()),
        }
        let desc = cmd.description().to_string();
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Forget all history (after a wholesale reset of the target).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────
