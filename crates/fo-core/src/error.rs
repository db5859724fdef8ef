//! Error type shared by the core and the designer crates.
//!
//! `Display` strings are written for end users: hosts surface them verbatim
//! as notices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid form JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("form JSON must be an array of records")]
    NotAnArray,

    #[error("Only one Form element is allowed in the Form Structure.")]
    FormElementExists,

    #[error("Create a Form element before adding pages.")]
    NoFormElement,

    #[error("no task with id `{0}`")]
    TaskNotFound(String),

    #[error("no page with id `{0}`")]
    PageNotFound(String),

    #[error("duplicate field id `{0}` in the Form Structure")]
    DuplicateId(String),

    #[error("load #{ticket} was superseded by load #{latest}")]
    StaleLoad { ticket: u64, latest: u64 },
}
