//! Error Classifier
//!
//! Maps an internal [`Error`] to the small set of outcomes a caller may
//! see. This runs once, where a directory operation's result turns into
//! a response. The generic server fault never carries internal text.

use crate::error::Error;

/// Reason for malformed identifiers
pub const MALFORMED_ID: &str = "Malformed identifier";
/// Reason for unknown identifiers
pub const NOT_FOUND: &str = "Not found";
/// Reason for every unclassified fault
pub const SERVER_FAULT: &str = "Server error, try later...";

/// Caller-facing failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Caller input was refused (400)
    Rejected,
    /// No such record (404)
    NotFound,
    /// Something broke on our side (500)
    ServerFault,
}

impl OutcomeKind {
    /// HTTP status code for this category
    pub fn status_code(&self) -> u16 {
        match self {
            OutcomeKind::Rejected => 400,
            OutcomeKind::NotFound => 404,
            OutcomeKind::ServerFault => 500,
        }
    }
}

/// A classified failure: category plus short machine-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub reason: String,
}

impl Outcome {
    fn new(kind: OutcomeKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Classify an error
pub fn classify(error: &Error) -> Outcome {
    match error {
        Error::MalformedId(_) => Outcome::new(OutcomeKind::Rejected, MALFORMED_ID),
        Error::Validation(rejection) => Outcome::new(OutcomeKind::Rejected, rejection.message()),
        Error::Constraint(msg) => Outcome::new(OutcomeKind::Rejected, msg.as_str()),
        Error::NotFound(_) => Outcome::new(OutcomeKind::NotFound, NOT_FOUND),
        other => {
            tracing::error!("Unclassified failure: {}", other);
            Outcome::new(OutcomeKind::ServerFault, SERVER_FAULT)
        }
    }
}
