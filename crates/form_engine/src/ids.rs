//! Identifier sources for newly created descriptors.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::model::FieldId;

/// Produces identifiers that are unique across calls within a session.
pub trait IdSource {
    fn next_id(&self) -> FieldId;
}

/// Random v4 UUIDs. Default source for interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> FieldId {
        FieldId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `field-<n>` ids; clones share the counter.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    counter: Arc<AtomicU64>,
}

impl SequentialIds {
    pub fn new(start: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(start)),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdSource for SequentialIds {
    #[inline]
    fn next_id(&self) -> FieldId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        FieldId::new(format!("field-{n}"))
    }
}

impl<T: IdSource + ?Sized> IdSource for Box<T> {
    fn next_id(&self) -> FieldId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_shared_between_clones() {
        let ids = SequentialIds::new(7);
        let other = ids.clone();
        assert_eq!(ids.next_id().as_str(), "field-7");
        assert_eq!(other.next_id().as_str(), "field-8");
    }

    #[test]
    fn uuid_ids_do_not_repeat() {
        let ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
