//! Core traits for the phonebook service
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DirectoryStore`]: Contact record storage
//! - [`IdAllocator`]: Identifier assignment policy

pub mod directory_store;
pub mod id_allocator;

pub use directory_store::{Contact, ContactDraft, ContactId, DirectoryStore, DirectoryStoreFactory};
pub use id_allocator::IdAllocator;
