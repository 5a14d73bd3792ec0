//! Error types for `dostuff-core`.
//!
//! Each variant carries the offending input so callers can report it without
//! re-deriving context.

/// Errors from the view navigation state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The navigation id is not one of the known route ids.
    #[error("unknown navigation id '{id}'")]
    UnknownRoute { id: String },

    /// The path segment does not name a view.
    #[error("no view is served at '{path}'")]
    UnknownView { path: String },
}

/// Errors from building a document snapshot.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// A CSS selector used to query the document failed to parse.
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// An unrecognised severity name was supplied as a report level.
    #[error("unknown severity '{name}', expected error, warning or info")]
    UnknownSeverity { name: String },
}

/// Errors from the "notify me" sign-up flow.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The submitted email address is empty or malformed.
    #[error("invalid email address: {reason}")]
    InvalidEmail { reason: String },

    /// The form endpoint answered with a non-success status.
    #[error("form endpoint rejected the submission with status {status}")]
    Rejected { status: u16 },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("form endpoint unreachable: {reason}")]
    Transport { reason: String },
}
