use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::types::PhysicsState;

/// Semi-implicit Euler step with per-axis speed clamps. No collision awareness.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Integrator {
    pub gravity: f32,
    pub max_vx: f32,
    pub max_vy: f32,
}

impl Integrator {
    pub fn from_config(cfg: &PhysicsConfig) -> Self {
        Self { gravity: cfg.gravity, max_vx: cfg.max_run_speed, max_vy: cfg.max_fall_speed }
    }

    /// Advance `state` and `pos` by one tick scaled by `time_scale`
    /// (1.0 at the target frame rate).
    pub fn apply(&self, state: &mut PhysicsState, time_scale: f32, pos: &mut Vec2) {
        let ay = if state.gravity_enabled { state.ay + self.gravity } else { state.ay };

        state.vx = (state.vx + state.ax * time_scale).clamp(-self.max_vx, self.max_vx);
        state.vy = (state.vy + ay * time_scale).clamp(-self.max_vy, self.max_vy);

        pos.x += state.vx * time_scale;
        pos.y += state.vy * time_scale;
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integ() -> Integrator {
        Integrator { gravity: 1.0, max_vx: 20.0, max_vy: 20.0 }
    }

    #[test]
    fn test_gravity_accumulates_without_touching_stored_accel() {
        let mut s = PhysicsState::new();
        let mut p = Vec2::ZERO;
        integ().apply(&mut s, 1.0, &mut p);
        integ().apply(&mut s, 1.0, &mut p);
        assert!((s.vy - 2.0).abs() < 1e-6);
        assert!((p.y - 3.0).abs() < 1e-6);
        assert_eq!(s.ay, 0.0);
    }

    #[test]
    fn test_no_gravity_constant_velocity() {
        let mut s = PhysicsState::new();
        s.enable_gravity(false);
        s.set_velocity(3.0, -2.0);
        let mut p = Vec2::new(10.0, 10.0);
        integ().apply(&mut s, 0.5, &mut p);
        assert!((p.x - 11.5).abs() < 1e-6);
        assert!((p.y - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_clamped_per_axis() {
        let mut s = PhysicsState::new();
        s.set_velocity(-50.0, 19.5);
        s.set_acceleration(0.0, 5.0);
        let mut p = Vec2::ZERO;
        integ().apply(&mut s, 1.0, &mut p);
        assert_eq!(s.vx, -20.0);
        assert_eq!(s.vy, 20.0);
        assert_eq!(p, Vec2::new(-20.0, 20.0));
    }

    #[test]
    fn test_zero_time_scale_is_noop() {
        let mut s = PhysicsState::new();
        s.set_velocity(4.0, 4.0);
        let mut p = Vec2::new(1.0, 2.0);
        integ().apply(&mut s, 0.0, &mut p);
        assert_eq!(p, Vec2::new(1.0, 2.0));
        assert_eq!(s.velocity(), Vec2::new(4.0, 4.0));
    }
}
