use crate::types::CollisionKind;

/// Point queries against the level's tile layer.
///
/// Implementations must be a pure function of level state for the duration
/// of one resolver call. Coordinates are world units; cells are square with
/// edge `tile_size()`.
pub trait TileQuery {
    fn tile_size(&self) -> f32;

    fn solid_at(&self, x: f32, y: f32) -> bool;

    fn icy_at(&self, _x: f32, _y: f32) -> bool {
        false
    }

    fn brick_at(&self, _x: f32, _y: f32) -> bool {
        false
    }

    fn hazard_at(&self, _x: f32, _y: f32) -> bool {
        false
    }
}

impl<T: TileQuery + ?Sized> TileQuery for &T {
    fn tile_size(&self) -> f32 { (**self).tile_size() }
    fn solid_at(&self, x: f32, y: f32) -> bool { (**self).solid_at(x, y) }
    fn icy_at(&self, x: f32, y: f32) -> bool { (**self).icy_at(x, y) }
    fn brick_at(&self, x: f32, y: f32) -> bool { (**self).brick_at(x, y) }
    fn hazard_at(&self, x: f32, y: f32) -> bool { (**self).hazard_at(x, y) }
}

/// Contract for anything stored in an [`ObjectPool`](crate::pool::ObjectPool).
pub trait Poolable {
    /// True once the entity is dead; the next cleanup pass frees its slot.
    fn removable(&self) -> bool;

    fn set_removable(&mut self, removable: bool);

    /// Per-frame behavior tick.
    fn update(&mut self, dt: f32);
}

/// Behavior-layer reaction to a confirmed overlap. The core only decides
/// that two entities collided and in what order; implementors decide what
/// happens.
pub trait Collide<Other: ?Sized> {
    fn collision(&mut self, other: &mut Other, kind: CollisionKind);
}
