use common::shapes::{OrientedRect, Rect, ShapeEnum, Vec2};
use fxhash::{FxHashMap, FxHashSet};

pub type EntityId = u32;

/// How an entity takes part in positional resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    /// Never moves and is never pushed.
    Static,
    /// Moves by its own velocity but is never pushed; pushes dynamic bodies.
    Kinematic,
    /// Moves by its own velocity and is pushed out of whatever it overlaps.
    #[default]
    Dynamic,
}

impl BodyKind {
    pub fn moves(self) -> bool {
        !matches!(self, BodyKind::Static)
    }
}

/// Detection strategy used when the entity initiates a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectionMode {
    /// Move, then test the resting shapes for overlap.
    #[default]
    Discrete,
    /// Sweep the bounds along the tick's displacement and clip the velocity
    /// at the earliest impacts.
    Continuous,
}

/// Shape used by the narrow phase, placed relative to the top-left corner of
/// the entity's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Collider {
    /// The bounds themselves.
    #[default]
    Bounds,
    Aabb {
        offset: Vec2,
        size: Vec2,
    },
    /// A rectangle of `size` at `offset`, rotated by `angle` radians around its center.
    Oriented {
        offset: Vec2,
        size: Vec2,
        angle: f32,
    },
}

impl Collider {
    pub fn shape(&self, bounds: &Rect) -> ShapeEnum {
        match *self {
            Collider::Bounds => ShapeEnum::Rect(*bounds),
            Collider::Aabb { offset, size } => ShapeEnum::Rect(Self::placed(bounds, offset, size)),
            Collider::Oriented {
                offset,
                size,
                angle,
            } => ShapeEnum::Oriented(OrientedRect::from_rect(
                &Self::placed(bounds, offset, size),
                angle,
            )),
        }
    }

    fn placed(bounds: &Rect, offset: Vec2, size: Vec2) -> Rect {
        Rect::new(bounds.x + offset.x, bounds.y + offset.y, size.x, size.y)
    }
}

/// Layer mask pair deciding which entities this one looks for.
///
/// The filter of the entity that initiates a test is the only one consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionFilter {
    pub layer: u32,
    pub collides_with: u32,
}

impl CollisionFilter {
    pub const ALL: CollisionFilter = CollisionFilter {
        layer: 1,
        collides_with: u32::MAX,
    };

    pub fn new(layer: u32, collides_with: u32) -> Self {
        Self {
            layer,
            collides_with,
        }
    }

    pub fn accepts(&self, other: &CollisionFilter) -> bool {
        self.collides_with & other.layer != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ALL
    }
}

/// Gameplay hook invoked once per side whenever a contact begins or ends.
///
/// `axis` points from `other` towards `entity`; it is zero for ends. The
/// returned flag is recorded on the event and does not affect detection.
pub trait Reaction {
    fn collision(&mut self, entity: EntityId, other: EntityId, begin: bool, axis: Vec2) -> bool;
}

impl<F> Reaction for F
where
    F: FnMut(EntityId, EntityId, bool, Vec2) -> bool,
{
    fn collision(&mut self, entity: EntityId, other: EntityId, begin: bool, axis: Vec2) -> bool {
        (self)(entity, other, begin, axis)
    }
}

/// One side of a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit axis pointing from the other entity towards this one. For swept
    /// hits this is the normal of the face that was struck.
    pub axis: Vec2,
    /// Penetration depth; zero for swept hits, which stop at the surface.
    pub depth: f32,
    /// Fraction of the tick's motion travelled before touching, for swept hits.
    pub time_of_impact: Option<f32>,
}

impl Contact {
    pub fn reversed(&self) -> Self {
        Self {
            axis: -self.axis,
            ..*self
        }
    }
}

/// Everything needed to spawn an entity.
pub struct EntityDesc {
    pub bounds: Rect,
    pub collider: Collider,
    pub velocity: Vec2,
    pub kind: BodyKind,
    pub mode: DetectionMode,
    pub collidable: bool,
    pub compenetrable: bool,
    pub filter: CollisionFilter,
    pub reaction: Option<Box<dyn Reaction>>,
}

impl EntityDesc {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            collider: Collider::Bounds,
            velocity: Vec2::zeros(),
            kind: BodyKind::Dynamic,
            mode: DetectionMode::Discrete,
            collidable: true,
            compenetrable: false,
            filter: CollisionFilter::ALL,
            reaction: None,
        }
    }

    pub fn fixed(bounds: Rect) -> Self {
        Self::new(bounds).with_kind(BodyKind::Static)
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = collider;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }

    pub fn with_compenetrable(mut self, compenetrable: bool) -> Self {
        self.compenetrable = compenetrable;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_reaction(mut self, reaction: impl Reaction + 'static) -> Self {
        self.reaction = Some(Box::new(reaction));
        self
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) bounds: Rect,
    pub(crate) collider: Collider,
    pub(crate) velocity: Vec2,
    /// Written at the start of each tick, read only through `previous_velocity()`.
    pub(crate) previous_velocity: Vec2,
    pub(crate) kind: BodyKind,
    pub(crate) mode: DetectionMode,
    pub(crate) collidable: bool,
    pub(crate) compenetrable: bool,
    pub(crate) filter: CollisionFilter,
    pub(crate) active: FxHashMap<EntityId, Contact>,
    pub(crate) previous: FxHashMap<EntityId, Contact>,
    /// Compenetrable contacts found by sweeping, kept alive by proximity.
    pub(crate) sensors: FxHashSet<EntityId>,
    /// Tick count at the moment removal was requested.
    pub(crate) removal_requested_at: Option<u64>,
    pub(crate) indexed: bool,
}

impl Entity {
    pub(crate) fn from_desc(id: EntityId, desc: &EntityDesc) -> Self {
        Self {
            id,
            bounds: desc.bounds,
            collider: desc.collider,
            velocity: desc.velocity,
            previous_velocity: desc.velocity,
            kind: desc.kind,
            mode: desc.mode,
            collidable: desc.collidable,
            compenetrable: desc.compenetrable,
            filter: desc.filter,
            active: FxHashMap::default(),
            previous: FxHashMap::default(),
            sensors: FxHashSet::default(),
            removal_requested_at: None,
            indexed: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn collider(&self) -> Collider {
        self.collider
    }

    pub fn shape(&self) -> ShapeEnum {
        self.collider.shape(&self.bounds)
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Velocity at the start of the last tick, before any correction.
    ///
    /// The pipeline only records it. Reactions compare it with `velocity` to
    /// tell which way the entity was heading when a contact clipped it.
    pub fn previous_velocity(&self) -> Vec2 {
        self.previous_velocity
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    pub fn is_compenetrable(&self) -> bool {
        self.compenetrable
    }

    pub fn filter(&self) -> CollisionFilter {
        self.filter
    }

    pub fn is_pending_removal(&self) -> bool {
        self.removal_requested_at.is_some()
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn active_collisions(&self) -> &FxHashMap<EntityId, Contact> {
        &self.active
    }

    pub fn previous_collisions(&self) -> &FxHashMap<EntityId, Contact> {
        &self.previous
    }

    /// Whether a test initiated by this entity may consider `other` at all.
    pub(crate) fn may_test(&self, other: &Entity) -> bool {
        other.id != self.id
            && other.collidable
            && other.indexed
            && !other.is_pending_removal()
            && self.filter.accepts(&other.filter)
    }
}

/// Snapshot of the fields of the other side of a test, taken so both
/// entities can be mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Counterpart {
    pub id: EntityId,
    pub shape: ShapeEnum,
    pub kind: BodyKind,
    pub compenetrable: bool,
}

impl From<&Entity> for Counterpart {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            shape: entity.shape(),
            kind: entity.kind,
            compenetrable: entity.compenetrable,
        }
    }
}
