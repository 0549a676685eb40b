//! Entity Component System (ECS) container
//!
//! Only the lifecycle of [`World`] exists so far; entity and component
//! management land on top of the allocator later.

pub mod entity;
pub mod world;

pub use entity::{EntityAllocator, EntityId};
pub use world::World;
