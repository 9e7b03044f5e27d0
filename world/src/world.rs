use crate::config::WorldConfig;
use crate::entity::{Contact, DetectionMode, Entity, EntityDesc, EntityId, Reaction};
use crate::error::{WorldError, WorldResult};
use crate::events::StepReport;
use common::shapes::{Point, Rect, Vec2};
use fxhash::{FxHashMap, FxHashSet};
use quadtree::{QuadTree, QuadtreeError, QuadtreeResult};
use tracing::{debug, warn};

/// Entities, their spatial index, and the per-tick collision pipeline.
///
/// Entities are processed in id order, which is also spawn order, so a run
/// is reproducible for a given sequence of calls.
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) index: QuadTree,
    pub(crate) entities: FxHashMap<EntityId, Entity>,
    pub(crate) order: Vec<EntityId>,
    pub(crate) reactions: FxHashMap<EntityId, Box<dyn Reaction>>,
    next_id: EntityId,
    tick: u64,
    elapsed: f32,
    /// Pairs that already produced a contact during the current tick.
    pub(crate) claimed: FxHashSet<(EntityId, EntityId)>,
    scratch: Vec<u32>,
}

impl World {
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, WorldConfig::default())
    }

    pub fn with_config(bounds: Rect, config: WorldConfig) -> Self {
        let index = QuadTree::new_with_config(bounds, config.index.clone());
        Self {
            config,
            index,
            entities: FxHashMap::default(),
            order: Vec::new(),
            reactions: FxHashMap::default(),
            next_id: 0,
            tick: 0,
            elapsed: 0.0,
            claimed: FxHashSet::default(),
            scratch: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.index.bounds()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time of all completed ticks.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Adds an entity and indexes it.
    ///
    /// Bounds outside the world are accepted but left un-indexed; the entity
    /// then shows up in every `StepReport::out_of_bounds` until it is moved
    /// back in or despawned.
    pub fn spawn(&mut self, mut desc: EntityDesc) -> WorldResult<EntityId> {
        let bounds = desc.bounds;
        if !bounds.is_valid() {
            return Err(QuadtreeError::InvalidRectangleDims {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
            }
            .into());
        }
        let id = self.next_id;
        self.next_id += 1;
        let mut entity = Entity::from_desc(id, &desc);
        entity.indexed = self.index.insert(id, bounds).is_ok();
        if let Some(reaction) = desc.reaction.take() {
            self.reactions.insert(id, reaction);
        }
        self.entities.insert(id, entity);
        self.order.push(id);
        Ok(id)
    }

    /// Schedules `id` for removal.
    ///
    /// The entity stops taking part in detection on the next tick, which
    /// still reports the ends of its contacts; it is purged on the tick after.
    pub fn despawn(&mut self, id: EntityId) -> WorldResult<()> {
        let tick = self.tick;
        let entity = self.entity_mut(id)?;
        if entity.removal_requested_at.is_none() {
            entity.removal_requested_at = Some(tick);
        }
        Ok(())
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> WorldResult<()> {
        self.live_entity_mut(id)?.velocity = velocity;
        Ok(())
    }

    /// Moves the top-left corner of `id`'s bounds to `position`.
    pub fn set_position(&mut self, id: EntityId, position: Point) -> WorldResult<()> {
        let entity = self.live_entity_mut(id)?;
        entity.bounds.x = position.x;
        entity.bounds.y = position.y;
        self.reindex(id)?;
        Ok(())
    }

    pub fn set_bounds(&mut self, id: EntityId, bounds: Rect) -> WorldResult<()> {
        if !bounds.is_valid() {
            return Err(QuadtreeError::InvalidRectangleDims {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
            }
            .into());
        }
        self.live_entity_mut(id)?.bounds = bounds;
        self.reindex(id)?;
        Ok(())
    }

    pub fn set_reaction(&mut self, id: EntityId, reaction: impl Reaction + 'static) -> WorldResult<()> {
        self.entity_mut(id)?;
        self.reactions.insert(id, Box::new(reaction));
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Entities in processing order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Current contacts of `id`, keyed by the other entity.
    pub fn contacts(&self, id: EntityId) -> Option<&FxHashMap<EntityId, Contact>> {
        self.entities.get(&id).map(|entity| &entity.active)
    }

    pub fn is_indexed(&self, id: EntityId) -> bool {
        self.index.contains(id)
    }

    /// Indexed entities whose bounds intersect `rect`, in id order.
    pub fn query_rect(&self, rect: &Rect) -> Vec<EntityId> {
        let mut found = Vec::new();
        self.index.query_rect(rect, &mut found);
        found.sort_unstable();
        found
    }

    /// Indexed entities whose bounds contain `point`, in id order.
    pub fn query_point(&self, point: Point) -> Vec<EntityId> {
        let mut found = Vec::new();
        self.index.query_point(point.x, point.y, &mut found);
        found.sort_unstable();
        found
    }

    pub fn query_all_pairs(&self) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        self.index.query_all_pairs(&mut pairs);
        pairs
    }

    /// Runs one tick: purge, detection and resolution for every live entity
    /// in id order, then begin/end notification.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "ignoring motion for a tick with an invalid time step");
            0.0
        };
        let mut report = StepReport {
            tick: self.tick + 1,
            started_at: self.elapsed,
            dt,
            ..StepReport::default()
        };
        report.purged = self.purge_removed();
        self.rotate_contacts();
        self.claimed.clear();

        for i in 0..self.order.len() {
            let id = self.order[i];
            let mode = match self.entities.get(&id) {
                Some(entity) if !entity.is_pending_removal() => entity.mode,
                _ => continue,
            };
            match mode {
                DetectionMode::Discrete => self.step_discrete(id, dt),
                DetectionMode::Continuous => self.step_continuous(id, dt),
            }
        }

        self.prune_pending_contacts();
        self.enforce_symmetry();
        self.emit_events(&mut report.events);
        report.out_of_bounds = self
            .entities()
            .filter(|entity| !entity.indexed && !entity.is_pending_removal())
            .map(|entity| entity.id)
            .collect();

        self.tick += 1;
        self.elapsed += dt;
        report
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> WorldResult<&mut Entity> {
        self.entities.get_mut(&id).ok_or_else(|| {
            debug!(id, "reference to an entity that does not exist");
            WorldError::UnknownEntity { id }
        })
    }

    fn live_entity_mut(&mut self, id: EntityId) -> WorldResult<&mut Entity> {
        let entity = self.entity_mut(id)?;
        if entity.is_pending_removal() {
            return Err(WorldError::PendingRemoval { id });
        }
        Ok(entity)
    }

    /// Brings the index entry of `id` in line with its bounds. Entities that
    /// left the world lose their entry until they come back.
    pub(crate) fn reindex(&mut self, id: EntityId) -> QuadtreeResult<()> {
        let Some(entity) = self.entities.get_mut(&id) else {
            return Err(QuadtreeError::UnknownEntity { value: id });
        };
        let result = if entity.indexed {
            self.index.update(id, entity.bounds)
        } else {
            self.index.insert(id, entity.bounds)
        };
        entity.indexed = result.is_ok();
        result
    }

    pub(crate) fn translate(&mut self, id: EntityId, delta: Vec2) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.bounds.translate(delta);
        }
        // Failures leave the entity un-indexed and are reported at the end of the tick.
        let _ = self.reindex(id);
    }

    /// Indexed entities whose bounds intersect `area`, sorted and without
    /// duplicates. Hand the buffer back with `release_candidates`.
    pub(crate) fn gather_candidates(&mut self, area: &Rect) -> Vec<u32> {
        let mut candidates = std::mem::take(&mut self.scratch);
        candidates.clear();
        self.index.query_rect(area, &mut candidates);
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    pub(crate) fn release_candidates(&mut self, candidates: Vec<u32>) {
        self.scratch = candidates;
    }

    /// Stores `contact` on `a` and its mirror on `b`, and claims the pair for
    /// the rest of the tick.
    pub(crate) fn record_contact(&mut self, a: EntityId, b: EntityId, contact: Contact) {
        self.claimed.insert(pair_key(a, b));
        if let Some(entity) = self.entities.get_mut(&a) {
            entity.active.insert(b, contact);
        }
        if let Some(entity) = self.entities.get_mut(&b) {
            entity.active.insert(a, contact.reversed());
        }
    }

    pub(crate) fn is_claimed(&self, a: EntityId, b: EntityId) -> bool {
        self.claimed.contains(&pair_key(a, b))
    }
}

#[inline(always)]
pub(crate) fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
