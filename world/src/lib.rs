//! Collision pipeline over a quadtree-indexed set of rectangular entities.
//!
//! Each `World::step` moves every live entity in id order, finds its contacts
//! with discrete overlap tests or swept tests, corrects positions or
//! velocities, and reports which contacts began or ended since the last tick.
//! Contacts are always stored on both sides with opposite axes. Despawned
//! entities stay around for one more tick so their contacts can end cleanly.

mod bookkeeping;
pub mod config;
mod continuous;
mod discrete;
pub mod entity;
pub mod error;
pub mod events;
pub mod world;

pub use common::shapes;
pub use config::WorldConfig;
pub use entity::{
    BodyKind, Collider, CollisionFilter, Contact, DetectionMode, Entity, EntityDesc, EntityId,
    Reaction,
};
pub use error::{WorldError, WorldResult};
pub use events::{CollisionEvent, StepReport};
pub use world::World;
