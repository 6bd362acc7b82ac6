//! Per-entity motion pipeline: integrate, then resolve against tiles.

use crate::api::TileQuery;
use crate::physics::Integrator;
use crate::resolver::{Contact, resolve};
use crate::types::{MovingBox, PhysicsState};

/// Advance a solid body by one tick and resolve it against the tile layer.
///
/// Velocity components on blocked axes are zeroed; the rest of `state` is
/// left to behavior code. Bodies that ignore tiles should call
/// [`Integrator::apply`] directly.
pub fn step_body<T: TileQuery + ?Sized>(
    state: &mut PhysicsState,
    body: &mut MovingBox,
    tiles: &T,
    integrator: &Integrator,
    time_scale: f32,
) -> Contact {
    body.prev = body.pos;
    integrator.apply(state, time_scale, &mut body.pos);
    let contact = resolve(tiles, body);
    if contact.blocked_x() {
        state.vx = 0.0;
    }
    if contact.blocked_y() {
        state.vy = 0.0;
    }
    contact
}
