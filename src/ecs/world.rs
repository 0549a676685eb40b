//! World - central ECS container

use super::EntityAllocator;

/// World holds all entities and components.
///
/// At this stage a world is only ever created empty and dropped again;
/// those two operations are what the benchmark harness measures.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: EntityAllocator,
}

impl World {
    /// Create a new, empty world
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
        }
    }

    /// Get number of alive entities
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}
