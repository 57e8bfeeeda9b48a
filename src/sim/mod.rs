//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by host-supplied timestamps and input snapshots
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod coverage;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{first_hit, overlaps};
pub use coverage::CoverageGrid;
pub use state::{
    Dog, GamePhase, GameState, Obstacle, ObstacleKind, PawPrint, PlacementMode, Sushi, TrailSample,
};
pub use tick::{InputState, tick};
