use crate::entity::{BodyKind, Contact, Counterpart, EntityId};
use crate::world::World;
use collisions::{overlap_aabb, swept_aabb, SweepHit};
use common::shapes::Vec2;
use smallvec::SmallVec;

struct Hit {
    other: Counterpart,
    sweep: SweepHit,
    distance: f32,
}

/// Earliest impact first; at equal times the closer entity comes first.
/// Resolving a later impact first could undo the correction of an earlier one.
fn sort_by_impact(hits: &mut [Hit]) {
    hits.sort_by(|a, b| {
        a.sweep
            .time_of_impact
            .total_cmp(&b.sweep.time_of_impact)
            .then(a.distance.total_cmp(&b.distance))
    });
}

impl World {
    /// Sweeps the bounds of `id` along `velocity * dt`, clips the velocity at
    /// every solid impact in time-of-impact order, then moves by what is left.
    pub(crate) fn step_continuous(&mut self, id: EntityId, dt: f32) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        entity.previous_velocity = entity.velocity;
        if !entity.kind.moves() {
            return;
        }
        let displacement = entity.velocity * dt;
        let current = entity.bounds;

        if entity.collidable && entity.indexed {
            let swept_area = current.union(&current.translated(displacement));
            let candidates = self.gather_candidates(&swept_area);
            let mut hits: SmallVec<[Hit; 8]> = SmallVec::new();
            for &other_id in &candidates {
                if self.is_claimed(id, other_id) {
                    continue;
                }
                let (Some(entity), Some(other)) =
                    (self.entities.get(&id), self.entities.get(&other_id))
                else {
                    continue;
                };
                if !entity.may_test(other) {
                    continue;
                }
                let Some(sweep) = swept_aabb(&current, displacement, &other.bounds) else {
                    continue;
                };
                hits.push(Hit {
                    other: Counterpart::from(other),
                    sweep,
                    distance: (current.center() - other.bounds.center()).norm(),
                });
            }
            self.release_candidates(candidates);

            sort_by_impact(&mut hits);
            for hit in &hits {
                self.resolve_impact(id, hit);
            }
        }

        if let Some(entity) = self.entities.get(&id) {
            let delta = entity.velocity * dt;
            if delta != Vec2::zeros() {
                self.translate(id, delta);
            }
        }
        self.refresh_sensors(id);
    }

    fn resolve_impact(&mut self, id: EntityId, hit: &Hit) {
        let other_id = hit.other.id;
        self.record_contact(
            id,
            other_id,
            Contact {
                axis: hit.sweep.normal,
                depth: 0.0,
                time_of_impact: Some(hit.sweep.time_of_impact),
            },
        );
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        if entity.compenetrable || hit.other.compenetrable {
            entity.sensors.insert(other_id);
            return;
        }
        if entity.kind != BodyKind::Dynamic {
            return;
        }
        let normal = hit.sweep.normal;
        let approach = normal.dot(&entity.velocity);
        if approach < 0.0 {
            entity.velocity -= normal * approach * (1.0 - hit.sweep.time_of_impact);
        }
    }

    /// Keeps compenetrable contacts found by earlier sweeps alive while the
    /// bounds, grown by the sensor margin, still reach the other entity.
    fn refresh_sensors(&mut self, id: EntityId) {
        let margin = self.config.sensor_margin;
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        if entity.sensors.is_empty() {
            return;
        }
        let reach = entity.bounds.expanded(margin);
        let mut kept: SmallVec<[(EntityId, Contact); 4]> = SmallVec::new();
        let mut expired: SmallVec<[EntityId; 4]> = SmallVec::new();
        for &other_id in &entity.sensors {
            if entity.active.contains_key(&other_id) {
                continue;
            }
            match self.entities.get(&other_id) {
                Some(other) if entity.may_test(other) && reach.intersects(&other.bounds) => {
                    let contact = overlap_aabb(&entity.bounds, &other.bounds)
                        .map(|penetration| Contact {
                            axis: penetration.axis,
                            depth: penetration.depth,
                            time_of_impact: None,
                        })
                        .or_else(|| entity.previous.get(&other_id).copied())
                        .unwrap_or(Contact {
                            axis: Vec2::zeros(),
                            depth: 0.0,
                            time_of_impact: None,
                        });
                    kept.push((other_id, contact));
                }
                _ => expired.push(other_id),
            }
        }
        kept.sort_unstable_by_key(|(other_id, _)| *other_id);
        for (other_id, contact) in kept {
            self.record_contact(id, other_id, contact);
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            for other_id in expired {
                entity.sensors.remove(&other_id);
            }
        }
    }
}
