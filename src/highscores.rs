//! Leaderboard system
//!
//! Persisted to LocalStorage, tracks the top 10 sessions ranked by coverage
//! (descending), ties broken by elapsed time (ascending).

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single finished-session entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player-entered name
    pub name: String,
    /// Final coverage percentage [0, 100]
    pub coverage: f32,
    /// Session length in seconds
    pub elapsed_seconds: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Leaderboard of best raking sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zen_rake_leaderboard_v1";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Better-than ordering: more coverage wins, faster time breaks ties
    fn beats(coverage: f32, elapsed_seconds: f32, other: &LeaderboardEntry) -> bool {
        coverage > other.coverage
            || (coverage == other.coverage && elapsed_seconds < other.elapsed_seconds)
    }

    /// Check if a session qualifies for the board
    pub fn qualifies(&self, coverage: f32, elapsed_seconds: f32) -> bool {
        if coverage <= 0.0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries
            .last()
            .map(|e| Self::beats(coverage, elapsed_seconds, e))
            .unwrap_or(true)
    }

    /// Add a session (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        coverage: f32,
        elapsed_seconds: f32,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(coverage, elapsed_seconds) {
            return None;
        }

        let entry = LeaderboardEntry {
            name: name.into(),
            coverage,
            elapsed_seconds,
            timestamp,
        };

        // Insertion point keeps the vec sorted best-first
        let pos = self
            .entries
            .iter()
            .position(|e| Self::beats(coverage, elapsed_seconds, e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best coverage on the board (if any)
    pub fn top_coverage(&self) -> Option<f32> {
        self.entries.first().map(|e| e.coverage)
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<Leaderboard>(&json) {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
