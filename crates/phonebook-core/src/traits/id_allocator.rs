// # Identifier Allocator Trait
//
// Produces identifiers for records about to be created.
//
// Allocators must be collision-free by construction: two calls never
// return the same identifier, no matter how they interleave. The old
// scheme of drawing a random integer in 1..=1000 without checking the
// live set is not offered.

use super::directory_store::ContactId;

/// Trait for identifier allocation policies
pub trait IdAllocator: Send + Sync {
    /// Allocate a fresh identifier
    fn next_id(&self) -> ContactId;

    /// Fixed length of every identifier this allocator emits, if any
    ///
    /// Stores use this to reject caller-supplied identifiers of the
    /// wrong length before doing a lookup.
    fn id_len(&self) -> Option<usize>;
}
