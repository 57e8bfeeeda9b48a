//! Zen Rake - a zen garden raking game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rake motion, coverage, spawning, game state)
//! - `highscores`: Leaderboard persisted to LocalStorage
//! - `settings`: Audio/display preferences

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::Leaderboard;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default canvas dimensions (the host may pass its own responsive size)
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

    /// Edge length of a quantized sand tile (pixels)
    pub const TILE_SIZE: f32 = 8.0;
    /// Side of the rake's square footprint (pixels)
    pub const RAKE_SIZE: f32 = 24.0;
    /// Radius of the circular coverage brush around the rake center.
    /// Wider than the visual rake so strokes feel full, not like thin lines.
    pub const COVER_RADIUS: f32 = 18.0;

    /// Pointer distance below which the rake doesn't move
    pub const RAKE_DEAD_ZONE: f32 = 2.0;
    /// Exponential-approach fraction applied to the rake-to-pointer vector each frame
    pub const RAKE_MOVE_FACTOR: f32 = 0.15;

    /// Minimum milliseconds between recorded trail samples
    pub const TRAIL_SAMPLE_INTERVAL_MS: f64 = 10.0;
    /// Maximum trail samples kept (oldest evicted first)
    pub const MAX_TRAIL_SAMPLES: usize = 10_000;

    /// Aura economy
    pub const MAX_AURA: f32 = 100.0;
    pub const AURA_COLLISION_LOSS: f32 = 10.0;
    /// Repeated overlap inside this window only penalizes once
    pub const COLLISION_COOLDOWN_MS: f64 = 500.0;
    pub const AURA_RAKE_GAIN: f32 = 0.02;
    pub const AURA_PAW_BONUS: f32 = 0.5;
    pub const AURA_SUSHI_BONUS: f32 = 5.0;
    pub const AURA_PLACEMENT_BONUS: f32 = 20.0;

    /// Dog spawn window: soft random after the min, guaranteed by the max
    pub const DOG_SPAWN_MIN_MS: f64 = 15_000.0;
    pub const DOG_SPAWN_MAX_MS: f64 = 30_000.0;
    pub const DOG_SPAWN_CHANCE: f32 = 0.02;
    /// Horizontal dog speed (pixels/second)
    pub const DOG_SPEED: f32 = 120.0;
    /// Dog spawns this far off-canvas and despawns a bit further out
    pub const DOG_SPAWN_MARGIN: f32 = 30.0;
    pub const DOG_DESPAWN_MARGIN: f32 = 50.0;
    /// Vertical inset keeping the dog away from the canvas edges
    pub const DOG_LANE_INSET: f32 = 50.0;
    /// Coverage invalidated within this radius of the dog
    pub const DOG_MESS_RADIUS: f32 = 16.0;
    /// Horizontal travel between paw print pairs
    pub const PAW_STRIDE: f32 = 15.0;
    pub const MAX_PAW_PRINTS: usize = 200;
    /// Paw prints within this distance of the rake get cleaned up
    pub const PAW_CLEANUP_RADIUS: f32 = RAKE_SIZE;

    /// Sushi spawn window (same two-threshold policy, independent timer)
    pub const SUSHI_SPAWN_MIN_MS: f64 = 20_000.0;
    pub const SUSHI_SPAWN_MAX_MS: f64 = 40_000.0;
    pub const SUSHI_SPAWN_CHANCE: f32 = 0.01;
    pub const SUSHI_EDGE_INSET: f32 = 20.0;
    pub const SUSHI_COLLECT_RADIUS: f32 = RAKE_SIZE + 20.0;

    /// Session clock
    pub const TIME_LIMIT_MS: f64 = 120_000.0;
    /// Coverage percentage required to win
    pub const WIN_COVERAGE: f32 = 95.0;
}

/// Clamp a top-left anchored square of side `size` into a `w` x `h` canvas
#[inline]
pub fn clamp_to_canvas(pos: Vec2, size: f32, w: f32, h: f32) -> Vec2 {
    Vec2::new(pos.x.clamp(0.0, w - size), pos.y.clamp(0.0, h - size))
}
