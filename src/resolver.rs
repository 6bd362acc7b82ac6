//! Swept box-vs-tilemap resolution.
//!
//! The box is walked from its last known good position toward the candidate
//! in unit steps, point-probing the tile layer at every step. The first step
//! that lands in a solid tile decides the slide/stop outcome.

use glam::Vec2;

use crate::api::TileQuery;
use crate::tiles::box_collides;
use crate::types::{MovingBox, Rect};

const CUT_EPS: f32 = 1e-4;

/// Which sides of the box were stopped short of the candidate position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Contact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    pub fn blocked_x(&self) -> bool { self.left || self.right }
    pub fn blocked_y(&self) -> bool { self.top || self.bottom }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Sweep {
    Vertical,
    Horizontal,
    Diagonal,
}

/// Resolve `body.prev -> body.pos` against the tile layer.
///
/// On return `body.pos` is the corrected position and `body.prev` equals it.
/// `body.prev` must not already penetrate a solid tile; spawn code is
/// expected to place boxes in free space before relying on this.
pub fn resolve<T: TileQuery + ?Sized>(tiles: &T, body: &mut MovingBox) -> Contact {
    let (pos, contact) = sweep(tiles, body.size, body.prev, body.pos);
    body.pos = pos;
    body.prev = pos;
    contact
}

/// Same as [`resolve`] for a detached pair of boxes of equal size.
/// Both are left at the corrected position.
pub fn resolve_rects<T: TileQuery + ?Sized>(tiles: &T, old: &mut Rect, candidate: &mut Rect) -> Contact {
    let (pos, contact) = sweep(tiles, candidate.size, old.min, candidate.min);
    candidate.min = pos;
    *old = *candidate;
    contact
}

fn sweep<T: TileQuery + ?Sized>(tiles: &T, size: Vec2, old: Vec2, target: Vec2) -> (Vec2, Contact) {
    let d = target - old;
    if d == Vec2::ZERO {
        return (old, Contact::default());
    }

    let (kind, step, lpath) = if d.x == 0.0 {
        (Sweep::Vertical, Vec2::new(0.0, d.y.signum()), d.y.abs())
    } else if d.y == 0.0 {
        (Sweep::Horizontal, Vec2::new(d.x.signum(), 0.0), d.x.abs())
    } else {
        let lpath = d.x.abs().max(d.y.abs());
        (Sweep::Diagonal, d / lpath, lpath)
    };
    let n = lpath.ceil().max(1.0) as u32;

    let collides = |p: Vec2| box_collides(tiles, &Rect::from_min_size(p, size));

    let mut safe = old;
    let mut hit = None;
    for i in 1..=n {
        let probe = if i == n { target } else { old + step * i as f32 };
        if collides(probe) {
            hit = Some(probe);
            break;
        }
        safe = probe;
    }

    let Some(probe) = hit else {
        return (target, Contact::default());
    };

    let resolved = match kind {
        Sweep::Vertical | Sweep::Horizontal => back_off(&collides, probe, step, n, safe),
        Sweep::Diagonal => {
            let slide_x = Vec2::new(target.x, safe.y);
            let slide_y = Vec2::new(safe.x, target.y);
            if !collides(slide_x) {
                slide_x
            } else if !collides(slide_y) {
                slide_y
            } else {
                escape_corner(&collides, probe, step, old, d.y.abs().ceil() as u32 + 1, safe)
            }
        }
    };

    let mut resolved = clamp_monotonic(resolved, old, step);
    if resolved != safe && collides(resolved) {
        log::warn!("resolution from {old:?} ended inside a tile at {resolved:?}, settling at {safe:?}");
        resolved = safe;
    }
    (resolved, contact_for(resolved, target, step))
}

/// Walk back from the colliding probe one step at a time until clear.
fn back_off<F>(collides: &F, probe: Vec2, step: Vec2, budget: u32, safe: Vec2) -> Vec2
where
    F: Fn(Vec2) -> bool,
{
    let mut p = probe;
    for _ in 0..=budget {
        p -= step;
        if !collides(p) {
            return p;
        }
    }
    log::warn!("back-off did not clear from {probe:?}; start box was penetrating");
    safe
}

/// Both axis slides are blocked: push along y away from the obstacle until
/// clear, never past the start row. If y alone cannot clear (inside corner),
/// settle on the last safe probe.
fn escape_corner<F>(collides: &F, probe: Vec2, step: Vec2, origin: Vec2, budget: u32, safe: Vec2) -> Vec2
where
    F: Fn(Vec2) -> bool,
{
    let mut p = probe;
    for _ in 0..budget {
        let y = p.y - step.y;
        if (step.y > 0.0 && y < origin.y) || (step.y < 0.0 && y > origin.y) {
            break;
        }
        p.y = y;
        if !collides(p) {
            log::trace!("corner escape: {probe:?} -> {p:?}");
            return p;
        }
    }
    log::trace!("corner escape blocked at {probe:?}, settling at {safe:?}");
    safe
}

/// Never end up behind the start point along the direction of travel.
fn clamp_monotonic(mut p: Vec2, origin: Vec2, step: Vec2) -> Vec2 {
    if (step.x > 0.0 && p.x < origin.x) || (step.x < 0.0 && p.x > origin.x) {
        p.x = origin.x;
    }
    if (step.y > 0.0 && p.y < origin.y) || (step.y < 0.0 && p.y > origin.y) {
        p.y = origin.y;
    }
    p
}

fn contact_for(resolved: Vec2, target: Vec2, step: Vec2) -> Contact {
    let cut_x = (resolved.x - target.x).abs() > CUT_EPS;
    let cut_y = (resolved.y - target.y).abs() > CUT_EPS;
    Contact {
        left: cut_x && step.x < 0.0,
        right: cut_x && step.x > 0.0,
        top: cut_y && step.y < 0.0,
        bottom: cut_y && step.y > 0.0,
    }
}
