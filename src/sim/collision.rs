//! Axis-aligned collision tests between the rake and garden obstacles

use glam::Vec2;

use super::state::Obstacle;

/// Check whether the rake's square footprint intersects an obstacle's rectangle.
///
/// Strict inequalities on every axis: rectangles that merely touch along an
/// edge do NOT overlap. Both dimensions use the same rule so slow frames
/// can't tunnel through a corner in one axis but not the other.
#[inline]
pub fn overlaps(rake_pos: Vec2, rake_size: f32, obstacle: &Obstacle) -> bool {
    rake_pos.x < obstacle.pos.x + obstacle.width
        && rake_pos.x + rake_size > obstacle.pos.x
        && rake_pos.y < obstacle.pos.y + obstacle.height
        && rake_pos.y + rake_size > obstacle.pos.y
}

/// Scan the obstacle list in order and return the index of the first hit.
///
/// List order is the tie-break when the rake overlaps several obstacles at
/// once; callers never act on more than one hit per frame.
pub fn first_hit(rake_pos: Vec2, rake_size: f32, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| overlaps(rake_pos, rake_size, o))
}
