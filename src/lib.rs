//! tilebonk: swept tile collision, integration, pooling and broad phase for 2D platformers

pub mod types;
pub mod api;
pub mod config;
pub mod error;
pub mod physics;
pub mod tiles;
pub mod resolver;
pub mod motion;
pub mod pool;
pub mod grid;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::config::PhysicsConfig;
pub use crate::error::{CoreError, CoreResult};
pub use crate::grid::{GridStats, PairHit, SpatialGrid, overlapping_pairs};
pub use crate::motion::step_body;
pub use crate::pool::{ObjectPool, PoolHandle};
pub use crate::resolver::{Contact, resolve};
pub use crate::tiles::TileGrid;
