//! Brush strokes
//!
//! Turns two consecutive pointer samples into an erase stroke: either a
//! single thick line or a fan of bristles whose orientation is smoothed from
//! segment to segment.

use glam::Vec2;
use image::Rgba;
use rand::Rng;

use super::raster::{Canvas, ERASE_COLOR, EraseStyle};
use crate::consts::*;
use crate::{rotate_point, smoothed_angle};

/// One strand of the bristle fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bristle {
    /// Position across the fan, measured from its leading edge (bristle 0 sits at 0)
    pub distance: f32,
    pub thickness: f32,
    pub color: Rgba<u8>,
}

/// Lay out `round(stroke_width / 3)` bristles with jittered spacing
pub fn make_bristles<R: Rng + ?Sized>(stroke_width: f32, rng: &mut R) -> Vec<Bristle> {
    let count = (stroke_width / BRISTLE_SPACING).round().max(0.0) as usize;
    if count == 0 {
        return Vec::new();
    }
    let gap = stroke_width / count as f32;

    (0..count)
        .map(|i| {
            let distance = if i == 0 {
                0.0
            } else {
                gap * i as f32 + rng.random_range(-gap / 2.0..gap / 2.0)
            };
            Bristle {
                distance,
                thickness: rng.random_range(BRISTLE_MIN_THICKNESS..BRISTLE_MAX_THICKNESS),
                color: ERASE_COLOR,
            }
        })
        .collect()
}

/// Brush state plus its bristle layout
#[derive(Debug, Clone)]
pub struct ScratchBrush {
    pub last_position: Vec2,
    pub position: Vec2,
    /// Smoothed stroke angle; `None` until a stroke has a direction
    current_angle: Option<f32>,
    bristles: Vec<Bristle>,
    bristle_stroke_width: f32,
    line_width: f32,
}

impl ScratchBrush {
    pub fn new<R: Rng + ?Sized>(line_width: f32, bristle_stroke_width: f32, rng: &mut R) -> Self {
        Self {
            last_position: Vec2::ZERO,
            position: Vec2::ZERO,
            current_angle: None,
            bristles: make_bristles(bristle_stroke_width, rng),
            bristle_stroke_width,
            line_width,
        }
    }

    pub fn bristles(&self) -> &[Bristle] {
        &self.bristles
    }

    pub fn current_angle(&self) -> Option<f32> {
        self.current_angle
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Start a fresh stroke at `origin`
    pub fn initialize(&mut self, origin: Vec2) {
        self.last_position = origin;
        self.position = origin;
        self.current_angle = None;
    }

    /// Advance the stroke to `position` without drawing
    pub fn update_position(&mut self, position: Vec2) {
        self.last_position = self.position;
        self.position = position;
    }

    fn apply_offset(&mut self, offset: Option<Vec2>) {
        if let Some(offset) = offset {
            self.position += offset;
        }
    }

    /// Angle for the current segment, committed as the new stroke angle
    fn advance_angle(&mut self) -> (Option<f32>, Option<f32>) {
        let old = self.current_angle;
        let new = smoothed_angle(self.last_position, self.position, old);
        self.current_angle = new;
        (old, new)
    }

    /// Erase one thick, softened line from the last to the current position
    pub fn render_simple_stroke<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        width: f32,
        offset: Option<Vec2>,
    ) {
        self.apply_offset(offset);
        self.advance_angle();
        let style = EraseStyle::new(width, LINE_BLUR, ERASE_COLOR);
        canvas.erase_segment(self.last_position, self.position, &style);
    }

    /// Erase the bristle fan between the last and current positions.
    ///
    /// Each bristle starts rotated by the previous angle and ends rotated by
    /// the new one, curving through a control point at the old position.
    pub fn render_bristle_stroke<C: Canvas + ?Sized>(&mut self, canvas: &mut C, offset: Option<Vec2>) {
        self.apply_offset(offset);
        let (old, new) = self.advance_angle();
        let Some(new) = new else {
            // No direction yet: nothing to orient the fan by
            return;
        };
        let old = old.unwrap_or(new);
        let half = self.bristle_stroke_width / 2.0;

        for bristle in &self.bristles {
            let offset = bristle.distance - half;
            let origin = rotate_point(offset, old, self.last_position);
            let destination = rotate_point(offset, new, self.position);
            let control = rotate_point(offset, new, self.last_position);
            let style = EraseStyle::new(bristle.thickness, bristle.thickness / 2.0, bristle.color);
            canvas.erase_quadratic(origin, control, destination, &style);
        }
    }
}
