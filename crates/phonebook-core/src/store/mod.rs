// # Directory Store Implementations
//
// This module provides implementations of the DirectoryStore trait for
// the two persistence strategies, plus the identifier allocators they use.

pub mod file;
pub mod ids;
pub mod memory;

pub use file::{FileDirectoryStore, FileDirectoryStoreFactory};
pub use ids::{ObjectIds, SequentialIds};
pub use memory::{MemoryDirectoryStore, MemoryDirectoryStoreFactory};
