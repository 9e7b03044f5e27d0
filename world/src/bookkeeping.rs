use crate::entity::{Contact, EntityId};
use crate::events::CollisionEvent;
use crate::world::World;
use common::shapes::Vec2;
use smallvec::SmallVec;
use tracing::{debug, warn};

impl World {
    /// Drops every entity whose removal was requested before the last
    /// completed tick, so each removed entity lives through exactly one tick
    /// of end-of-contact reporting.
    pub(crate) fn purge_removed(&mut self) -> Vec<EntityId> {
        let completed = self.tick();
        let purged: Vec<EntityId> = self
            .entities()
            .filter(|entity| {
                entity
                    .removal_requested_at
                    .is_some_and(|requested| requested < completed)
            })
            .map(|entity| entity.id)
            .collect();
        if purged.is_empty() {
            return purged;
        }

        for &id in &purged {
            if self.index.contains(id) {
                // The entry is known to exist, removal cannot fail.
                let _ = self.index.remove(id);
            }
            self.entities.remove(&id);
            self.reactions.remove(&id);
            debug!(id, "purged removed entity");
        }
        self.order.retain(|id| !purged.contains(id));
        for entity in self.entities.values_mut() {
            for id in &purged {
                entity.active.remove(id);
                entity.previous.remove(id);
                entity.sensors.remove(id);
            }
        }
        purged
    }

    /// Moves every entity's contacts of the last tick into `previous`.
    pub(crate) fn rotate_contacts(&mut self) {
        for entity in self.entities.values_mut() {
            entity.previous = std::mem::take(&mut entity.active);
        }
    }

    pub(crate) fn prune_pending_contacts(&mut self) {
        let pending: SmallVec<[EntityId; 8]> = self
            .entities()
            .filter(|entity| entity.is_pending_removal())
            .map(|entity| entity.id)
            .collect();
        if pending.is_empty() {
            return;
        }
        for entity in self.entities.values_mut() {
            if entity.is_pending_removal() {
                entity.active.clear();
                entity.sensors.clear();
            } else {
                entity.active.retain(|other, _| !pending.contains(other));
            }
        }
    }

    /// Checks that every contact has a mirror with the opposite axis.
    ///
    /// A broken pair is a bug in the pipeline: debug builds stop here, release
    /// builds copy the surviving side onto the missing one.
    pub(crate) fn enforce_symmetry(&mut self) {
        let mut broken: Vec<(EntityId, EntityId, Contact)> = Vec::new();
        for entity in self.entities() {
            for (&other_id, contact) in &entity.active {
                let mirrored = self
                    .entities
                    .get(&other_id)
                    .and_then(|other| other.active.get(&entity.id));
                let intact = other_id != entity.id
                    && mirrored.is_some_and(|mirror| mirror.axis == -contact.axis);
                if !intact {
                    broken.push((entity.id, other_id, *contact));
                }
            }
        }
        debug_assert!(broken.is_empty(), "asymmetric contacts: {broken:?}");

        for (id, other_id, contact) in broken {
            warn!(id, other_id, "asymmetric contact, resyncing");
            let restorable = id != other_id && self.entities.contains_key(&other_id);
            if !restorable {
                if let Some(entity) = self.entities.get_mut(&id) {
                    entity.active.remove(&other_id);
                }
                continue;
            }
            if let Some(other) = self.entities.get_mut(&other_id) {
                other.active.insert(id, contact.reversed());
            }
        }
    }

    /// Diffs `previous` against `active` for every entity, invokes reactions
    /// and appends the resulting events: all begins, then all ends, each in
    /// entity order and then in order of the other entity.
    pub(crate) fn emit_events(&mut self, events: &mut Vec<CollisionEvent>) {
        let mut begins: Vec<CollisionEvent> = Vec::new();
        let mut ends: Vec<CollisionEvent> = Vec::new();
        for &id in &self.order {
            let Some(entity) = self.entities.get(&id) else {
                continue;
            };
            let first = begins.len();
            begins.extend(
                entity
                    .active
                    .iter()
                    .filter(|(other, _)| !entity.previous.contains_key(other))
                    .map(|(&other, contact)| CollisionEvent {
                        entity: id,
                        other,
                        begin: true,
                        axis: contact.axis,
                        time_of_impact: contact.time_of_impact,
                        handled: false,
                    }),
            );
            begins[first..].sort_unstable_by_key(|event| event.other);

            let first = ends.len();
            ends.extend(
                entity
                    .previous
                    .keys()
                    .filter(|other| !entity.active.contains_key(other))
                    .map(|&other| CollisionEvent {
                        entity: id,
                        other,
                        begin: false,
                        axis: Vec2::zeros(),
                        time_of_impact: None,
                        handled: false,
                    }),
            );
            ends[first..].sort_unstable_by_key(|event| event.other);
        }

        for mut event in begins.into_iter().chain(ends) {
            if let Some(reaction) = self.reactions.get_mut(&event.entity) {
                event.handled = reaction.collision(event.entity, event.other, event.begin, event.axis);
            }
            events.push(event);
        }
    }
}
