//! Fixed physics constants for one play session.
//!
//! Loaded once (defaults or JSON) and passed by reference; nothing in the
//! per-frame path re-reads or mutates it.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Tile edge in world units.
    pub tile_size: f32,
    /// Downward acceleration added while gravity is enabled (units/tick²).
    pub gravity: f32,
    /// Vertical speed clamp (units/tick). Bounds resolver step counts.
    pub max_fall_speed: f32,
    /// Horizontal speed clamp (units/tick).
    pub max_run_speed: f32,
    /// Broad-phase cell edge in world units.
    pub grid_cell_size: f32,

    pub bullet_capacity: usize,
    pub particle_capacity: usize,
    pub upgrade_capacity: usize,
    pub floating_text_capacity: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            gravity: 1.2,
            max_fall_speed: 20.0,
            max_run_speed: 20.0,
            grid_cell_size: 128.0,
            bullet_capacity: 8,
            particle_capacity: 256,
            upgrade_capacity: 32,
            floating_text_capacity: 16,
        }
    }
}

impl PhysicsConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> CoreResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let positive = [
            ("tile_size", self.tile_size),
            ("max_fall_speed", self.max_fall_speed),
            ("max_run_speed", self.max_run_speed),
            ("grid_cell_size", self.grid_cell_size),
        ];
        for (field, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(CoreError::InvalidConfig {
                    field,
                    reason: format!("must be finite and > 0, got {v}"),
                });
            }
        }
        if !self.gravity.is_finite() {
            return Err(CoreError::InvalidConfig {
                field: "gravity",
                reason: format!("must be finite, got {}", self.gravity),
            });
        }
        let capacities = [
            ("bullet_capacity", self.bullet_capacity),
            ("particle_capacity", self.particle_capacity),
            ("upgrade_capacity", self.upgrade_capacity),
            ("floating_text_capacity", self.floating_text_capacity),
        ];
        for (field, n) in capacities {
            if n == 0 {
                return Err(CoreError::InvalidConfig { field, reason: "capacity must be > 0".into() });
            }
        }
        Ok(())
    }
}
