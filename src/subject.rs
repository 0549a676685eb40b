//! The type under test, as seen by the harness
//!
//! A subject only has to come into existence without arguments and be
//! released again. Releasing is `Drop`.

use thiserror::Error;

use crate::ecs::World;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    #[error("allocation failed: {0}")]
    Allocation(String),
    #[error("construction failed: {0}")]
    Construction(String),
}

pub trait Subject: Sized {
    /// Bring one instance into existence. A failure must not leave a
    /// partially constructed value behind.
    fn construct() -> Result<Self, SubjectError>;
}

impl Subject for World {
    fn construct() -> Result<Self, SubjectError> {
        Ok(World::new())
    }
}

/// Heap placement: one allocation per instance on top of `S` itself.
impl<S: Subject> Subject for Box<S> {
    fn construct() -> Result<Self, SubjectError> {
        S::construct().map(Box::new)
    }
}
