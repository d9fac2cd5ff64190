//! REST Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) of the
//! phonebook REST surface. Records themselves are serialized straight
//! from [`phonebook_core::Contact`] as `{ "id", "name", "number" }`.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Collection endpoint for contact records.
pub const ENDPOINT_PERSONS: &str = "/api/persons";
/// Single-record endpoint; `:id` is the record identifier.
pub const ENDPOINT_PERSON: &str = "/api/persons/:id";
/// Human-readable summary page.
pub const ENDPOINT_INFO: &str = "/info";

// --- Data Transfer Objects ---

/// Body of create and update requests.
///
/// Both fields are optional on the wire so that an absent field is
/// reported as "Missing values" by the validator instead of failing
/// deserialization.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub number: Option<String>,
}

/// Body of every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short machine-readable reason.
    pub error: String,
}

/// Body returned for unmatched routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: String,
}
