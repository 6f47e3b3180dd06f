//! Error types shared by the dashboard controllers.

use thiserror::Error;
use uuid::Uuid;

use crate::models::enums::{FormField, ModalKind};

/// User-correctable input problem: an empty required field or a value
/// that does not parse. State is left unchanged when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ValidationError {
    /// Human-readable reason, shown inline or as a warning toast.
    pub reason: String,
    /// Offending field, when the failure is tied to a single input.
    pub field: Option<FormField>,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            field: None,
        }
    }

    pub fn for_field(field: FormField, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            field: Some(field),
        }
    }
}

/// Errors raised by dashboard operations.
///
/// Only `Validation` is user-facing. The rest are programmer errors that
/// the fixed UI should never produce; they are returned instead of
/// panicking so the event loop can log them.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No modal is open")]
    ModalNotOpen,

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Field {field:?} is not part of the {kind:?} form")]
    FieldNotInForm { field: FormField, kind: ModalKind },

    #[error("Unknown record: {0}")]
    UnknownRecord(Uuid),

    #[error("Search result index {0} out of range")]
    NoSuchSearchResult(usize),

    #[error("Authentication did not complete")]
    AuthIncomplete,

    #[error("Internal lock error")]
    LockPoisoned,
}

/// A string that does not name a known variant of a closed enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}
