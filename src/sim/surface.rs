//! The scratchable cover
//!
//! Owns the cover raster and the pointer brush. Pointer drags and scripted
//! sweeps both erase through here; completion tracking only reads.

use glam::Vec2;
use image::RgbaImage;

use super::brush::ScratchBrush;
use super::geom::Rect;
use super::raster::{Canvas, RasterCanvas};

#[derive(Debug, Clone)]
pub struct ScratchSurface<C: Canvas = RasterCanvas> {
    canvas: C,
    brush: ScratchBrush,
    /// Width of the line stroke in progress
    stroke_width: f32,
}

impl<C: Canvas> ScratchSurface<C> {
    /// Wrap a canvas already showing the opaque cover
    pub fn new(canvas: C, brush: ScratchBrush) -> Self {
        let stroke_width = brush.line_width();
        Self {
            canvas,
            brush,
            stroke_width,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    /// Whole play area as a rectangle
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(0.0, 0.0, w as f32, h as f32)
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn brush(&self) -> &ScratchBrush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut ScratchBrush {
        &mut self.brush
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Start a new erase path at the brush's current position
    pub fn begin_stroke(&mut self, width: Option<f32>) {
        self.stroke_width = width.unwrap_or(self.brush.line_width());
        self.brush.last_position = self.brush.position;
    }

    /// Erase a line from the brush's last to current position
    pub fn erase_line(&mut self, offset: Option<Vec2>) {
        self.brush
            .render_simple_stroke(&mut self.canvas, self.stroke_width, offset);
    }

    /// Erase the bristle fan from the brush's last to current position
    pub fn erase_bristles(&mut self, offset: Option<Vec2>) {
        self.brush.render_bristle_stroke(&mut self.canvas, offset);
    }

    /// Erase a line with a brush other than the pointer's (scripted sweeps)
    pub fn erase_line_with(&mut self, brush: &mut ScratchBrush, width: f32, offset: Option<Vec2>) {
        brush.render_simple_stroke(&mut self.canvas, width, offset);
    }

    /// Copy of the pixels under `rect` (clipped; empty when degenerate)
    pub fn sample_pixels(&self, rect: Rect) -> RgbaImage {
        self.canvas.read_rect(rect.to_pixels())
    }
}

impl ScratchSurface<RasterCanvas> {
    /// Snapshot of the whole cover
    pub fn snapshot(&self) -> &RgbaImage {
        self.canvas.image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::raster::CLEARED;
    use image::Rgba;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const COVER: Rgba<u8> = Rgba([10, 120, 200, 255]);

    fn surface(w: u32, h: u32) -> ScratchSurface {
        let mut rng = Pcg32::seed_from_u64(11);
        ScratchSurface::new(
            RasterCanvas::solid(w, h, COVER),
            ScratchBrush::new(LINE_WIDTH, BRISTLE_STROKE_WIDTH, &mut rng),
        )
    }

    #[test]
    fn test_starts_fully_covered() {
        let s = surface(60, 40);
        assert_eq!(s.size(), (60, 40));
        assert!(s.snapshot().pixels().all(|p| *p == COVER));
    }

    #[test]
    fn test_custom_stroke_width() {
        let mut s = surface(200, 200);
        s.brush_mut().initialize(Vec2::new(20.0, 100.0));
        s.begin_stroke(Some(10.0));
        s.brush_mut().update_position(Vec2::new(180.0, 100.0));
        s.erase_line(None);

        assert_eq!(*s.snapshot().get_pixel(100, 100), CLEARED);
        // Default width would have reached 20 px out; 10 px width does not
        assert_eq!(*s.snapshot().get_pixel(100, 115), COVER);
    }

    #[test]
    fn test_sample_pixels_reads_sub_rect() {
        let mut s = surface(100, 100);
        s.brush_mut().initialize(Vec2::new(0.0, 10.0));
        s.begin_stroke(Some(4.0));
        s.brush_mut().update_position(Vec2::new(100.0, 10.0));
        s.erase_line(None);

        let sample = s.sample_pixels(Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(sample.dimensions(), (50, 20));
        assert!(sample.pixels().any(|p| *p == CLEARED));
        assert_eq!(s.sample_pixels(Rect::new(10.0, 10.0, 0.0, 0.0)).dimensions(), (0, 0));
    }

    #[test]
    fn test_erase_with_external_brush_leaves_pointer_brush() {
        let mut s = surface(100, 100);
        s.brush_mut().initialize(Vec2::new(1.0, 1.0));
        let mut sweep = s.brush().clone();
        sweep.initialize(Vec2::new(10.0, 50.0));
        sweep.update_position(Vec2::new(90.0, 50.0));
        s.erase_line_with(&mut sweep, 20.0, None);

        assert_eq!(*s.snapshot().get_pixel(50, 50), CLEARED);
        assert_eq!(s.brush().position, Vec2::new(1.0, 1.0));
    }
}
