use crate::entity::EntityId;
use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WorldError {
    #[error("entity {id} does not exist")]
    UnknownEntity { id: EntityId },
    #[error("entity {id} is already scheduled for removal")]
    PendingRemoval { id: EntityId },
    #[error(transparent)]
    Index(#[from] QuadtreeError),
}

pub type WorldResult<T> = Result<T, WorldError>;
