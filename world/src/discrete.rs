use crate::entity::{BodyKind, Contact, Counterpart, EntityId};
use crate::world::World;
use collisions::{overlap_shapes, Penetration};
use common::shapes::{Shape, Vec2};

impl World {
    /// Moves `id` by its velocity, then pushes it (or what it hit) out of
    /// every overlap its collider has with the candidates found around it.
    /// Static entities only ever take part as the other side.
    pub(crate) fn step_discrete(&mut self, id: EntityId, dt: f32) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        entity.previous_velocity = entity.velocity;
        if entity.kind.moves() && entity.velocity != Vec2::zeros() {
            let delta = entity.velocity * dt;
            self.translate(id, delta);
        }

        let area = match self.entities.get(&id) {
            Some(entity) if entity.kind.moves() && entity.collidable && entity.indexed => {
                entity.shape().bounding_box()
            }
            _ => return,
        };
        let candidates = self.gather_candidates(&area);
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
            // Earlier corrections may have moved either side; snapshot both now.
            let me = Counterpart::from(entity);
            let other = Counterpart::from(other);
            let Some(penetration) = overlap_shapes(&me.shape, &other.shape) else {
                continue;
            };
            self.record_contact(
                id,
                other_id,
                Contact {
                    axis: penetration.axis,
                    depth: penetration.depth,
                    time_of_impact: None,
                },
            );
            self.resolve_overlap(&me, &other, penetration);
        }
        self.release_candidates(candidates);
    }

    /// Positional correction for one overlap. Dynamic bodies are pushed in full
    /// out of anything that is not dynamic; two dynamic bodies each take a
    /// share of the push and converge over several ticks. Compenetrable
    /// contacts are never corrected.
    fn resolve_overlap(&mut self, me: &Counterpart, other: &Counterpart, penetration: Penetration) {
        if me.compenetrable || other.compenetrable {
            return;
        }
        let soft = self.config.soft_correction_factor;
        let (mine, theirs) = match (me.kind, other.kind) {
            (BodyKind::Dynamic, BodyKind::Dynamic) => (soft, soft),
            (BodyKind::Dynamic, BodyKind::Static | BodyKind::Kinematic) => (1.0, 0.0),
            (BodyKind::Static | BodyKind::Kinematic, BodyKind::Dynamic) => (0.0, 1.0),
            (BodyKind::Static | BodyKind::Kinematic, BodyKind::Static | BodyKind::Kinematic) => {
                return
            }
        };
        let push = penetration.translation();
        if mine > 0.0 {
            self.translate(me.id, push * mine);
        }
        if theirs > 0.0 {
            self.translate(other.id, -push * theirs);
        }
    }
}
