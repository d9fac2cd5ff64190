//! Contact rules: Format Validator and Duplicate Guard
//!
//! Both are pure functions. Rules are evaluated in a fixed order and the
//! first failing rule wins, so a record with a blank name and a bad
//! number is reported as [`Rejection::MissingValues`].
//!
//! Pipeline order is format first, then duplicates.

use thiserror::Error;

use crate::traits::{Contact, ContactDraft, ContactId};

/// Reason a candidate name/number pair was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A field is absent, empty or whitespace-only
    #[error("Missing values")]
    MissingValues,

    /// The number holds something other than digits and hyphens
    #[error("Invalid number: use only digits and the hyphen -")]
    InvalidNumber,

    /// Another record already uses this name
    #[error("Duplicate name")]
    DuplicateName,

    /// Another record already uses this number
    #[error("Duplicate number")]
    DuplicateNumber,
}

impl Rejection {
    /// Caller-visible reason string
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingValues => "Missing values",
            Rejection::InvalidNumber => "Invalid number: use only digits and the hyphen -",
            Rejection::DuplicateName => "Duplicate name",
            Rejection::DuplicateNumber => "Duplicate number",
        }
    }
}

/// Check the shape of a candidate pair
///
/// Rules, first failure wins:
/// 1. Both fields present and non-blank after trimming
/// 2. Number made only of ASCII digits and `-`
///
/// On success the trimmed values are returned as a [`ContactDraft`].
pub fn validate_format(
    name: Option<&str>,
    number: Option<&str>,
) -> Result<ContactDraft, Rejection> {
    let name = name.map(str::trim).unwrap_or_default();
    let number = number.map(str::trim).unwrap_or_default();

    if name.is_empty() || number.is_empty() {
        return Err(Rejection::MissingValues);
    }

    if !is_valid_number(number) {
        return Err(Rejection::InvalidNumber);
    }

    Ok(ContactDraft::new(name, number))
}

/// Digits and hyphens only; callers check emptiness separately
fn is_valid_number(number: &str) -> bool {
    number.chars().all(|c| c.is_ascii_digit() || c == '-')
}

/// Reject a draft whose name or number is already taken
///
/// Matching is exact and case-sensitive. Name is checked before number.
/// `except` names the record being updated so it does not collide with
/// itself.
pub fn check_duplicates(
    draft: &ContactDraft,
    existing: &[Contact],
    except: Option<&ContactId>,
) -> Result<(), Rejection> {
    let others = || existing.iter().filter(|c| Some(&c.id) != except);

    if others().any(|c| c.name == draft.name) {
        return Err(Rejection::DuplicateName);
    }

    if others().any(|c| c.number == draft.number) {
        return Err(Rejection::DuplicateNumber);
    }

    Ok(())
}
