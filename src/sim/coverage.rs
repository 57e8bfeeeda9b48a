//! Quantized sand-tile coverage tracking
//!
//! Continuous rake positions are quantized into discrete tile keys so that
//! "how much of the garden has been raked" is a set-cardinality question.
//! The set only stores visited tiles, so memory scales with raked area
//! rather than canvas size.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Set of raked sand tiles plus the canvas-derived tile counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageGrid {
    /// Packed (col, row) tile keys. Tuple keys, not strings: lookups stay
    /// allocation-free on the per-frame path.
    tiles: HashSet<(i32, i32)>,
    tile_size: f32,
    cols: i32,
    rows: i32,
}

impl CoverageGrid {
    pub fn new(canvas_w: f32, canvas_h: f32, tile_size: f32) -> Self {
        Self {
            tiles: HashSet::new(),
            tile_size,
            cols: (canvas_w / tile_size).floor() as i32,
            rows: (canvas_h / tile_size).floor() as i32,
        }
    }

    /// Mark every tile whose center lies within `radius` of `center`.
    ///
    /// Circular footprint rather than a square stamp - the rounded brush is
    /// what makes strokes feel like raking instead of painting pixels.
    pub fn mark(&mut self, center: Vec2, radius: f32) {
        self.for_tiles_in_footprint(center, radius, |tiles, key| {
            tiles.insert(key);
        });
    }

    /// Remove every tile in the same circular footprint (dog mess)
    pub fn invalidate(&mut self, center: Vec2, radius: f32) {
        self.for_tiles_in_footprint(center, radius, |tiles, key| {
            tiles.remove(&key);
        });
    }

    fn for_tiles_in_footprint(
        &mut self,
        center: Vec2,
        radius: f32,
        mut apply: impl FnMut(&mut HashSet<(i32, i32)>, (i32, i32)),
    ) {
        let min_col = ((center.x - radius) / self.tile_size).floor() as i32;
        let max_col = ((center.x + radius) / self.tile_size).ceil() as i32;
        let min_row = ((center.y - radius) / self.tile_size).floor() as i32;
        let max_row = ((center.y + radius) / self.tile_size).ceil() as i32;
        let r_sq = radius * radius;

        for col in min_col.max(0)..=max_col.min(self.cols - 1) {
            for row in min_row.max(0)..=max_row.min(self.rows - 1) {
                let tile_center = Vec2::new(
                    (col as f32 + 0.5) * self.tile_size,
                    (row as f32 + 0.5) * self.tile_size,
                );
                if (tile_center - center).length_squared() <= r_sq {
                    apply(&mut self.tiles, (col, row));
                }
            }
        }
    }

    /// Raked percentage of the whole canvas, clamped to [0, 100]
    pub fn percent(&self) -> f32 {
        let total = (self.cols * self.rows).max(1) as f32;
        (100.0 * self.tiles.len() as f32 / total).min(100.0)
    }

    /// Number of raked tiles (for the renderer and tests)
    pub fn marked_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_marked(&self, col: i32, row: i32) -> bool {
        self.tiles.contains(&(col, row))
    }

    /// Iterate raked tile keys (render order is not significant)
    pub fn iter(&self) -> impl Iterator<Item = &(i32, i32)> {
        self.tiles.iter()
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }
}
