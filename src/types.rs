use glam::Vec2;

/// Axis-aligned rectangle in world units. `min` is the top-left corner; y grows downward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { min: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn right(&self) -> f32 { self.min.x + self.size.x }
    pub fn bottom(&self) -> f32 { self.min.y + self.size.y }
    pub fn max(&self) -> Vec2 { self.min + self.size }
    pub fn center(&self) -> Vec2 { self.min + self.size * 0.5 }

    pub fn translated(&self, d: Vec2) -> Self {
        Self { min: self.min + d, size: self.size }
    }

    /// Strict interior overlap. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.right()
            && other.min.x < self.right()
            && self.min.y < other.bottom()
            && other.min.y < self.bottom()
    }

    /// Minimum-penetration overlap of `self` (A) against `other` (B).
    ///
    /// The normal points from B into A along the axis of least penetration.
    pub fn overlap(&self, other: &Rect) -> Option<Overlap> {
        if !self.overlaps(other) {
            return None;
        }
        let h0 = self.size * 0.5;
        let h1 = other.size * 0.5;
        let c0 = self.center();
        let d = other.center() - c0;
        let ox = (h0.x + h1.x) - d.x.abs();
        let oy = (h0.y + h1.y) - d.y.abs();

        let (depth, normal, axis_h) = if ox <= oy {
            let nx = if d.x >= 0.0 { -1.0 } else { 1.0 };
            (ox, Vec2::new(nx, 0.0), h0.x)
        } else {
            let ny = if d.y >= 0.0 { -1.0 } else { 1.0 };
            (oy, Vec2::new(0.0, ny), h0.y)
        };

        // Project A's center onto B, then move to A's surface along the normal
        let bmin = other.min;
        let bmax = other.max();
        let mut contact = Vec2::new(c0.x.clamp(bmin.x, bmax.x), c0.y.clamp(bmin.y, bmax.y));
        contact -= normal * axis_h;

        Some(Overlap { normal, depth, contact })
    }
}

/// Overlap contact result between two entity boxes.
#[derive(Copy, Clone, Debug)]
pub struct Overlap {
    /// Separating normal, from B into A.
    pub normal: Vec2,
    /// Penetration depth (> 0).
    pub depth: f32,
    /// Representative contact point on A's surface.
    pub contact: Vec2,
}

/// The box every moving entity embeds: current position, size, and the
/// last known non-penetrating position the sweep starts from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MovingBox {
    pub pos: Vec2,
    pub size: Vec2,
    pub prev: Vec2,
}

impl MovingBox {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "box size must be non-negative");
        Self { pos, size, prev: pos }
    }

    pub fn rect(&self) -> Rect { Rect::from_min_size(self.pos, self.size) }
    pub fn prev_rect(&self) -> Rect { Rect::from_min_size(self.prev, self.size) }

    /// Mark the current position as the sweep start for the next frame.
    pub fn snapshot(&mut self) {
        self.prev = self.pos;
    }

    /// Teleport: moves both the position and the sweep start.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev = pos;
    }
}

/// Velocity/acceleration state of one continuously moving entity.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PhysicsState {
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub gravity_enabled: bool,
}

impl PhysicsState {
    /// At rest, gravity on.
    pub fn new() -> Self {
        Self { gravity_enabled: true, ..Default::default() }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn velocity(&self) -> Vec2 { Vec2::new(self.vx, self.vy) }

    pub fn set_acceleration(&mut self, ax: f32, ay: f32) {
        self.ax = ax;
        self.ay = ay;
    }

    pub fn acceleration(&self) -> Vec2 { Vec2::new(self.ax, self.ay) }

    pub fn enable_gravity(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }
}

/// How two entities met, handed to the behavior layer's collision callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    /// Plain overlap.
    Normal,
    /// One entity came down on top of the other (stomp).
    Squish,
    /// Hit from below through a tile.
    Bump,
}
