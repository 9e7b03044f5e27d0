use crate::entity::EntityId;
use common::shapes::Vec2;

/// A contact starting or ending, seen from `entity`'s side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity: EntityId,
    pub other: EntityId,
    pub begin: bool,
    /// Points from `other` towards `entity`. Zero for ends.
    pub axis: Vec2,
    /// Fraction of the tick at which a swept hit happened.
    pub time_of_impact: Option<f32>,
    /// What `entity`'s reaction returned, `false` when it has none.
    pub handled: bool,
}

/// Outcome of one `World::step`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Number of the tick that produced this report, starting at 1.
    pub tick: u64,
    /// Simulated time at the start of the tick.
    pub started_at: f32,
    pub dt: f32,
    /// Begins first, then ends, each ordered by entity and then by other.
    pub events: Vec<CollisionEvent>,
    /// Entities whose bounds left the world and are no longer indexed.
    pub out_of_bounds: Vec<EntityId>,
    /// Entities removed for good at the start of this tick.
    pub purged: Vec<EntityId>,
}

impl StepReport {
    pub fn begins(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter().filter(|event| event.begin)
    }

    pub fn ends(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter().filter(|event| !event.begin)
    }

    pub fn events_for(&self, entity: EntityId) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter().filter(move |event| event.entity == entity)
    }

    /// Absolute simulated time of a swept hit.
    pub fn impact_time(&self, event: &CollisionEvent) -> Option<f32> {
        event
            .time_of_impact
            .map(|fraction| self.started_at + fraction * self.dt)
    }
}
