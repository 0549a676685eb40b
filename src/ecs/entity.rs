//! Entity bookkeeping

use std::collections::HashSet;

/// Entity ID type - simple numeric ID
pub type EntityId = u64;

/// Entity allocator
#[derive(Debug, Clone, Default)]
pub struct EntityAllocator {
    next_id: EntityId,
    alive: HashSet<EntityId>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            alive: HashSet::new(),
        }
    }

    /// Number of live entities
    pub fn count(&self) -> usize {
        self.alive.len()
    }

    /// Next id that would be handed out
    pub fn next_id(&self) -> EntityId {
        self.next_id
    }
}
