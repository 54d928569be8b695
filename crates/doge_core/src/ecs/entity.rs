//! Entity handles
//!
//! An entity is nothing but a process-unique 64-bit id. Ids come from a single
//! monotonically increasing counter and are never handed out twice, so a stale
//! handle can only ever miss (`has` returns false), never alias a newer entity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque entity handle.
///
/// Ordering follows creation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u64);

impl Entity {
    /// Issue a fresh handle that has never been issued before.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id, for diagnostics.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entities_are_unique_and_ordered() {
        let a = Entity::new();
        let b = Entity::new();
        let c = Entity::new();

        assert!(a < b && b < c);

        let ids: HashSet<_> = (0..1000).map(|_| Entity::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_copies_compare_equal() {
        let e = Entity::new();
        let copy = e;
        assert_eq!(e, copy);
        assert_eq!(format!("{e}"), format!("#{}", e.id()));
    }
}
