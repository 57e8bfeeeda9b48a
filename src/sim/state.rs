//! Game state and core simulation types
//!
//! The whole snapshot lives here: the renderer reads it, the tick mutates
//! it, nothing else touches it mid-frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::coverage::CoverageGrid;
use super::spawn;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title/menu screen, no simulation running
    Menu,
    /// Active raking session
    Playing,
    /// Coverage threshold reached
    Victory,
    /// Aura depleted or time ran out short of the threshold
    GameOver,
}

/// Kinds of garden obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Tree,
    Pond,
}

impl ObstacleKind {
    /// Size used for session-start garden generation
    pub fn natural_size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Rock => (24.0, 24.0),
            ObstacleKind::Tree => (32.0, 40.0),
            ObstacleKind::Pond => (64.0, 48.0),
        }
    }

    /// Size used for player-placed obstacles (chunkier than generated ones)
    pub fn placed_size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Rock => (36.0, 36.0),
            ObstacleKind::Tree => (48.0, 60.0),
            ObstacleKind::Pond => (96.0, 72.0),
        }
    }
}

/// A static garden obstacle (axis-aligned rectangle, top-left anchored)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

/// A recorded rake position for stroke rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailSample {
    pub pos: Vec2,
    /// Host timestamp (ms) when the sample was recorded
    pub time: f64,
}

/// The roaming dog: trots straight across the garden, ruining coverage
/// and leaving paw prints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Trot animation phase, wraps mod 4
    pub anim_frame: f32,
    pub facing_right: bool,
    /// Horizontal distance since the last paw print pair
    pub stride: f32,
}

/// Residue left behind the dog
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PawPrint {
    pub pos: Vec2,
    /// Host timestamp (ms) when dropped
    pub age: f64,
}

/// The floating bonus item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sushi {
    pub pos: Vec2,
    /// Bob animation phase, wraps mod 2π
    pub anim_frame: f32,
}

/// Selected obstacle kind for the placement reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementMode {
    #[default]
    None,
    Rock,
    Tree,
    Pond,
}

impl PlacementMode {
    pub fn obstacle_kind(&self) -> Option<ObstacleKind> {
        match self {
            PlacementMode::None => None,
            PlacementMode::Rock => Some(ObstacleKind::Rock),
            PlacementMode::Tree => Some(ObstacleKind::Tree),
            PlacementMode::Pond => Some(ObstacleKind::Pond),
        }
    }
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game snapshot
///
/// Owned by the simulation step; the renderer only ever sees a fully-formed
/// prior snapshot. Deserialized snapshots get a re-seeded RNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "fresh_rng")]
    pub rng: Pcg32,

    /// Canvas dimensions (host-supplied; responsive layouts vary)
    pub canvas_w: f32,
    pub canvas_h: f32,

    pub phase: GamePhase,
    /// Rake top-left corner, always clamped inside the canvas
    pub rake_pos: Vec2,
    /// Health/energy in [0, MAX_AURA]; zero ends the session
    pub aura: f32,

    pub obstacles: Vec<Obstacle>,
    next_obstacle_id: u32,

    pub coverage: CoverageGrid,
    pub trail: Vec<TrailSample>,
    pub(crate) last_trail_time: f64,

    /// Set each frame the rake overlaps an obstacle
    pub is_colliding: bool,
    pub(crate) last_collision_time: f64,

    pub dog: Option<Dog>,
    pub paw_prints: Vec<PawPrint>,
    pub(crate) last_dog_spawn: f64,

    pub sushi: Option<Sushi>,
    pub(crate) last_sushi_spawn: f64,

    pub placement_mode: PlacementMode,
    pub placements_available: u32,

    /// Timestamp (ms) when the session entered Playing
    pub start_time: f64,
    /// Milliseconds since start_time, updated each tick
    pub elapsed_ms: f64,
    pub(crate) last_tick_time: f64,
}

impl GameState {
    /// Create a menu-phase snapshot with a freshly generated garden
    pub fn new(seed: u64, canvas_w: f32, canvas_h: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let obstacles = spawn::generate_garden(&mut rng, canvas_w, canvas_h);
        let next_obstacle_id = obstacles.len() as u32;

        Self {
            seed,
            rng,
            canvas_w,
            canvas_h,
            phase: GamePhase::Menu,
            rake_pos: Vec2::new(
                (canvas_w - RAKE_SIZE) / 2.0,
                (canvas_h - RAKE_SIZE) / 2.0,
            ),
            aura: MAX_AURA,
            obstacles,
            next_obstacle_id,
            coverage: CoverageGrid::new(canvas_w, canvas_h, TILE_SIZE),
            trail: Vec::new(),
            last_trail_time: 0.0,
            is_colliding: false,
            last_collision_time: 0.0,
            dog: None,
            paw_prints: Vec::new(),
            last_dog_spawn: 0.0,
            sushi: None,
            last_sushi_spawn: 0.0,
            placement_mode: PlacementMode::None,
            placements_available: 0,
            start_time: 0.0,
            elapsed_ms: 0.0,
            last_tick_time: 0.0,
        }
    }

    /// Begin a playing session at host timestamp `now` (ms).
    ///
    /// A restart is a fresh `GameState::new` followed by `start` - terminal
    /// phases never resume in place.
    pub fn start(&mut self, now: f64) {
        self.phase = GamePhase::Playing;
        self.aura = MAX_AURA;
        self.coverage = CoverageGrid::new(self.canvas_w, self.canvas_h, TILE_SIZE);
        self.trail.clear();
        self.paw_prints.clear();
        self.dog = None;
        self.sushi = None;
        self.placement_mode = PlacementMode::None;
        self.placements_available = 0;
        self.is_colliding = false;
        self.start_time = now;
        self.elapsed_ms = 0.0;
        self.last_tick_time = now;
        self.last_trail_time = now;
        // Spawn timers start counting from session start
        self.last_dog_spawn = now;
        self.last_sushi_spawn = now;
        // The first collision should penalize immediately
        self.last_collision_time = now - COLLISION_COOLDOWN_MS;
        log::info!("Session started (seed {})", self.seed);
    }

    /// Milliseconds left on the session clock
    pub fn remaining_ms(&self) -> f64 {
        (TIME_LIMIT_MS - self.elapsed_ms).max(0.0)
    }

    pub fn coverage_percent(&self) -> f32 {
        self.coverage.percent()
    }

    /// Allocate an id for an appended obstacle
    pub(crate) fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        id
    }

    /// Host-side placement selection (HUD buttons)
    pub fn select_placement(&mut self, mode: PlacementMode) {
        if self.placements_available > 0 {
            self.placement_mode = mode;
        }
    }

    /// The out-of-core placement action: spend one placement credit to drop
    /// a new obstacle centered on `pos` for a flat aura reward.
    ///
    /// Silently ignored when nothing is selected or no credits remain.
    pub fn place(&mut self, pos: Vec2) {
        if self.phase != GamePhase::Playing || self.placements_available == 0 {
            return;
        }
        let Some(kind) = self.placement_mode.obstacle_kind() else {
            return;
        };

        let (width, height) = kind.placed_size();
        let top_left = Vec2::new(
            (pos.x - width / 2.0).clamp(0.0, self.canvas_w - width),
            (pos.y - height / 2.0).clamp(0.0, self.canvas_h - height),
        );
        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle {
            id,
            pos: top_left,
            width,
            height,
            kind,
        });

        self.placements_available -= 1;
        if self.placements_available == 0 {
            self.placement_mode = PlacementMode::None;
        }
        self.aura = (self.aura + AURA_PLACEMENT_BONUS).min(MAX_AURA);
        log::info!("Placed {:?} at {:.0},{:.0}", kind, top_left.x, top_left.y);
    }
}
