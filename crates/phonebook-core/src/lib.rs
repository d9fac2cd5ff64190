// # phonebook-core
//
// Core library for the phonebook contact-directory service.
//
// ## Architecture Overview
//
// This library holds every business rule of the directory:
// - **Format Validator** / **Duplicate Guard**: Rule checks in [`rules`]
// - **IdAllocator**: Identifier policies for each store variant
// - **DirectoryStore**: Trait for contact storage (memory and file variants)
// - **OriginFirewall**: Allow/deny decision on a request's declared origin
// - **Directory**: Service that runs the validation pipeline against a store
// - **classify**: Maps internal failures to caller-facing outcomes
//
// ## Design Principles
//
// 1. **Library-First**: The HTTP layer and daemon only wire these pieces together
// 2. **Single Writer**: Mutations pass through one gate in [`Directory`]
// 3. **Classify Once**: Errors become outcomes at exactly one boundary

pub mod traits;
pub mod rules;
pub mod store;
pub mod directory;
pub mod firewall;
pub mod registry;
pub mod config;
pub mod error;
pub mod outcome;

// Re-export core types for convenience
pub use traits::{Contact, ContactDraft, ContactId, DirectoryStore, IdAllocator};
pub use rules::Rejection;
pub use directory::{Directory, DirectoryRules};
pub use firewall::{Decision, OriginFirewall};
pub use registry::StoreRegistry;
pub use config::{PhonebookConfig, ServerConfig, StoreConfig};
pub use error::{Error, Result};
pub use outcome::{Outcome, OutcomeKind, classify};
pub use store::{FileDirectoryStore, MemoryDirectoryStore};
