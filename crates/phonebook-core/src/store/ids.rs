// # Identifier Allocators
//
// - `SequentialIds`: decimal counter for the memory store
// - `ObjectIds`: fixed-length 24 hex character tokens for the file store
//
// Both hand out values from an atomic counter, so concurrent creations
// can never receive the same identifier.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::{ContactId, IdAllocator};

/// Length of every identifier produced by [`ObjectIds`]
pub const OBJECT_ID_LEN: usize = 24;

/// Hex digits of the counter part of an object id
const COUNTER_HEX_LEN: usize = 16;

/// Monotonic decimal identifiers: "1", "2", "3", ...
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&self) -> ContactId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ContactId::new(n.to_string())
    }

    fn id_len(&self) -> Option<usize> {
        None
    }
}

/// Document-style identifiers
///
/// Layout: 8 hex digits of creation time (seconds since the epoch)
/// followed by 16 hex digits of a counter. The counter is seeded above
/// every identifier already persisted, so reloading a store never
/// reissues an old value.
#[derive(Debug)]
pub struct ObjectIds {
    counter: AtomicU64,
}

impl ObjectIds {
    /// Start counting at zero
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Start counting above the highest counter found in `existing`
    ///
    /// Identifiers that do not have the object id layout are ignored.
    pub fn seeded_from<'a>(existing: impl IntoIterator<Item = &'a ContactId>) -> Self {
        let next = existing
            .into_iter()
            .filter_map(|id| Self::counter_of(id.as_str()))
            .max()
            .map_or(0, |max| max.saturating_add(1));

        Self {
            counter: AtomicU64::new(next),
        }
    }

    /// Extract the counter part of a well-formed object id
    fn counter_of(id: &str) -> Option<u64> {
        if id.len() != OBJECT_ID_LEN || !id.is_ascii() {
            return None;
        }
        u64::from_str_radix(&id[OBJECT_ID_LEN - COUNTER_HEX_LEN..], 16).ok()
    }
}

impl Default for ObjectIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for ObjectIds {
    fn next_id(&self) -> ContactId {
        let secs = chrono::Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        ContactId::new(format!("{:08x}{:016x}", secs, n))
    }

    fn id_len(&self) -> Option<usize> {
        Some(OBJECT_ID_LEN)
    }
}
