//! Scratch Card - a 3x3 scratch-to-reveal prize game
//!
//! Core modules:
//! - `sim`: Deterministic game core (brush, surface, grid, tracking, auto-scratch)
//! - `settings`: Data-driven game configuration

pub mod settings;
pub mod sim;

pub use settings::{AutoScratchScope, BrushStyle, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz, drives auto-scratch playback)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default play area (square scene)
    pub const SCENE_WIDTH: u32 = 800;
    pub const SCENE_HEIGHT: u32 = 800;
    /// Largest accepted play-area side
    pub const MAX_PLAY_AREA: u32 = 8192;

    /// Grid layout
    pub const GRID_COLUMNS: usize = 3;
    pub const GRID_ROWS: usize = 3;
    pub const CELL_COUNT: usize = GRID_COLUMNS * GRID_ROWS;
    /// Occurrences of one item needed for a win run
    pub const WIN_RUN: usize = 3;

    /// Brush defaults
    pub const LINE_WIDTH: f32 = 50.0;
    pub const BRISTLE_STROKE_WIDTH: f32 = 100.0;
    pub const BRISTLE_SPACING: f32 = 3.0;
    pub const BRISTLE_MIN_THICKNESS: f32 = 2.0;
    pub const BRISTLE_MAX_THICKNESS: f32 = 4.0;
    /// Edge softness of the simple line (pixels)
    pub const LINE_BLUR: f32 = 1.0;

    /// Completion tracking
    pub const SCRATCH_HIT_BOX: f32 = 50.0;
    pub const AUTO_COMPLETE_PERCENT: f32 = 40.0;
    /// Progress tiers (fraction of the whole card)
    pub const LARGE_PROGRESS: f32 = 0.1;
    pub const SMALL_PROGRESS: f32 = 0.03;

    /// Auto-scratch sweep
    pub const AUTO_SCRATCH_PADDING: f32 = 15.0;
    pub const AUTO_SCRATCH_STEPS: f32 = 5.0;
    /// Milliseconds of sweep per unit of path length
    pub const AUTO_SCRATCH_MS_PER_UNIT: f32 = 0.8;

    /// Upper bound on whole-grid regeneration attempts
    pub const MAX_GENERATION_ATTEMPTS: u32 = 1000;
}

/// Raw direction from `origin` to `destination`, rotated so that "up" is zero.
///
/// Uses a truncating remainder, so the result lies in (-2π, 2π).
#[inline]
pub fn bearing(origin: Vec2, destination: Vec2) -> f32 {
    use std::f32::consts::{FRAC_PI_2, TAU};
    let d = destination - origin;
    (d.y.atan2(d.x) - FRAC_PI_2) % TAU
}

/// Signed minimal rotation taking `b` onto `a`, wrapped into [-π, π)
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let b = if b > 0.0 { b } else { b + TAU };
    let diff = ((a - b + PI) % TAU) - PI;
    if diff < -PI { diff + TAU } else { diff }
}

/// Smoothed stroke angle for the segment `origin -> destination`.
///
/// Without a previous angle the raw bearing is used. Otherwise the previous
/// angle is turned by the shortest rotation onto the bearing, so a reversal
/// never flips the stroke. Zero-length segments keep the previous angle.
pub fn smoothed_angle(origin: Vec2, destination: Vec2, previous: Option<f32>) -> Option<f32> {
    if (destination - origin).length_squared() <= f32::EPSILON {
        return previous;
    }
    let bearing = bearing(origin, destination);
    match previous {
        None => Some(bearing),
        Some(old) => Some(old - angle_diff(old, bearing)),
    }
}

/// Offset `origin` by `distance` along the direction `angle`
#[inline]
pub fn rotate_point(distance: f32, angle: f32, origin: Vec2) -> Vec2 {
    origin + Vec2::new(angle.cos(), angle.sin()) * distance
}
