//! Software raster for the scratch cover
//!
//! The `Canvas` trait is the drawing seam the brush and surface talk to.
//! Erasing behaves like a `destination-out` composite: covered pixels lose
//! alpha in proportion to stroke coverage and never gain it back. A pixel
//! whose alpha reaches zero is stored as fully transparent black, which is
//! what completion sampling counts.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::geom::PixelRect;

/// Color strokes are drawn with; only its alpha matters when erasing
pub const ERASE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A fully erased pixel
pub const CLEARED: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How a stroke removes cover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseStyle {
    /// Full-strength width of the stroke
    pub width: f32,
    /// Extra soft falloff beyond the width (blur / glow), in pixels
    pub softness: f32,
    /// Fraction of alpha removed at full coverage (0.0 - 1.0)
    pub strength: f32,
}

impl EraseStyle {
    pub fn new(width: f32, softness: f32, color: Rgba<u8>) -> Self {
        Self {
            width,
            softness,
            strength: color[3] as f32 / 255.0,
        }
    }

    /// Coverage in [0, 1] of a pixel at `distance` from the stroke centerline
    #[inline]
    fn coverage(&self, distance: f32) -> f32 {
        let half = self.width / 2.0;
        if distance <= half {
            1.0
        } else if self.softness > 0.0 && distance < half + self.softness {
            1.0 - (distance - half) / self.softness
        } else {
            0.0
        }
    }

    #[inline]
    fn reach(&self) -> f32 {
        self.width / 2.0 + self.softness.max(0.0)
    }
}

/// Drawing surface the scratch core erases into and samples from
pub trait Canvas {
    /// Raster dimensions in pixels
    fn size(&self) -> (u32, u32);

    /// Erase a round-capped straight segment
    fn erase_segment(&mut self, from: Vec2, to: Vec2, style: &EraseStyle);

    /// Erase a quadratic Bézier `from -> to` bent toward `control`
    fn erase_quadratic(&mut self, from: Vec2, control: Vec2, to: Vec2, style: &EraseStyle) {
        let hull = from.distance(control) + control.distance(to);
        let steps = ((hull / 4.0).ceil() as usize).clamp(1, 64);
        let mut prev = from;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let u = 1.0 - t;
            let p = from * (u * u) + control * (2.0 * u * t) + to * (t * t);
            self.erase_segment(prev, p, style);
            prev = p;
        }
    }

    /// Copy of the pixels under `rect`, clipped to the raster
    fn read_rect(&self, rect: PixelRect) -> RgbaImage;
}

/// In-memory RGBA canvas
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    /// Canvas filled with one opaque color
    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Canvas showing `cover`, stretched to `width x height`
    pub fn with_cover(cover: &RgbaImage, width: u32, height: u32) -> Self {
        let image = if cover.dimensions() == (width, height) {
            cover.clone()
        } else {
            image::imageops::resize(cover, width, height, image::imageops::FilterType::Triangle)
        };
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn erase_segment(&mut self, from: Vec2, to: Vec2, style: &EraseStyle) {
        if style.strength <= 0.0 || style.width <= 0.0 || !from.is_finite() || !to.is_finite() {
            return;
        }
        let (w, h) = self.size();
        let reach = style.reach();
        // Clip in float space; far-off endpoints must not reach the integer casts
        let min = (from.min(to) - Vec2::splat(reach)).floor().max(Vec2::ZERO);
        let max = (from.max(to) + Vec2::splat(reach))
            .ceil()
            .min(Vec2::new(w as f32, h as f32));
        if min.x >= max.x || min.y >= max.y {
            return;
        }
        let clip = PixelRect {
            x: min.x as i32,
            y: min.y as i32,
            width: (max.x - min.x) as u32,
            height: (max.y - min.y) as u32,
        };

        for y in clip.y as u32..clip.y as u32 + clip.height {
            for x in clip.x as u32..clip.x as u32 + clip.width {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let amount = style.coverage(distance_to_segment(center, from, to)) * style.strength;
                erase_pixel(self.image.get_pixel_mut(x, y), amount);
            }
        }
    }

    fn read_rect(&self, rect: PixelRect) -> RgbaImage {
        let (w, h) = self.size();
        let clip = rect.clip(w, h);
        if clip.is_empty() {
            return RgbaImage::new(0, 0);
        }
        image::imageops::crop_imm(&self.image, clip.x as u32, clip.y as u32, clip.width, clip.height)
            .to_image()
    }
}

/// Remove `amount` (0-1) of a pixel's alpha; alpha never increases
#[inline]
fn erase_pixel(px: &mut Rgba<u8>, amount: f32) {
    if amount <= 0.0 || px[3] == 0 {
        return;
    }
    let alpha = (px[3] as f32 * (1.0 - amount.min(1.0))).floor() as u8;
    if alpha == 0 {
        *px = CLEARED;
    } else {
        px[3] = alpha;
    }
}

/// Shortest distance from `p` to the segment `a-b`
#[inline]
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVER: Rgba<u8> = Rgba([200, 180, 40, 255]);

    fn cleared_in(canvas: &RasterCanvas) -> usize {
        canvas.image().pixels().filter(|p| **p == CLEARED).count()
    }

    #[test]
    fn test_segment_clears_its_footprint() {
        let mut canvas = RasterCanvas::solid(100, 100, COVER);
        let style = EraseStyle::new(10.0, 0.0, ERASE_COLOR);
        canvas.erase_segment(Vec2::new(20.0, 50.0), Vec2::new(80.0, 50.0), &style);

        assert_eq!(*canvas.image().get_pixel(50, 50), CLEARED);
        assert_eq!(*canvas.image().get_pixel(20, 52), CLEARED);
        // Outside the stroke the cover is untouched
        assert_eq!(*canvas.image().get_pixel(50, 60), COVER);
        assert_eq!(*canvas.image().get_pixel(5, 50), COVER);
    }

    #[test]
    fn test_soft_edge_only_lowers_alpha() {
        let mut canvas = RasterCanvas::solid(40, 40, COVER);
        let style = EraseStyle::new(4.0, 6.0, ERASE_COLOR);
        canvas.erase_segment(Vec2::new(5.0, 20.5), Vec2::new(35.0, 20.5), &style);

        let fringe = canvas.image().get_pixel(20, 24);
        assert!(fringe[3] > 0 && fringe[3] < 255, "fringe alpha {}", fringe[3]);
        assert_eq!(&fringe.0[..3], &COVER.0[..3]);
    }

    #[test]
    fn test_translucent_color_erases_partially() {
        let mut canvas = RasterCanvas::solid(20, 20, COVER);
        let style = EraseStyle::new(8.0, 0.0, Rgba([0, 0, 0, 128]));
        canvas.erase_segment(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), &style);
        let px = canvas.image().get_pixel(10, 10);
        assert!(px[3] > 0 && px[3] < 255);
    }

    #[test]
    fn test_erase_outside_bounds_is_silent() {
        let mut canvas = RasterCanvas::solid(50, 50, COVER);
        let style = EraseStyle::new(20.0, 1.0, ERASE_COLOR);
        canvas.erase_segment(Vec2::new(-100.0, -100.0), Vec2::new(-60.0, -80.0), &style);
        canvas.erase_segment(Vec2::new(500.0, 10.0), Vec2::new(900.0, 10.0), &style);
        assert_eq!(cleared_in(&canvas), 0);

        // Partially outside: clipped, not rejected
        canvas.erase_segment(Vec2::new(-10.0, 25.0), Vec2::new(10.0, 25.0), &style);
        assert!(cleared_in(&canvas) > 0);
    }

    #[test]
    fn test_far_off_endpoint_still_erases_on_canvas_part() {
        let mut canvas = RasterCanvas::solid(100, 100, COVER);
        let style = EraseStyle::new(10.0, 0.0, ERASE_COLOR);
        canvas.erase_segment(Vec2::new(10.0, 10.0), Vec2::new(5.0e9, 10.0), &style);
        assert_eq!(*canvas.image().get_pixel(50, 10), CLEARED);
        assert_eq!(*canvas.image().get_pixel(99, 9), CLEARED);
        assert_eq!(*canvas.image().get_pixel(50, 30), COVER);

        // Entirely off the canvas
        canvas.erase_segment(Vec2::new(-5.0e9, -50.0), Vec2::new(-4.0e9, -50.0), &style);
        canvas.erase_segment(Vec2::new(200.0, 50.0), Vec2::new(5.0e9, 50.0), &style);
        assert_eq!(*canvas.image().get_pixel(50, 50), COVER);
    }

    #[test]
    fn test_quadratic_follows_control_point() {
        let mut canvas = RasterCanvas::solid(100, 100, COVER);
        let style = EraseStyle::new(3.0, 0.0, ERASE_COLOR);
        canvas.erase_quadratic(
            Vec2::new(10.0, 90.0),
            Vec2::new(50.0, 10.0),
            Vec2::new(90.0, 90.0),
            &style,
        );
        // Apex of the curve sits halfway to the control point
        assert_eq!(*canvas.image().get_pixel(50, 50), CLEARED);
        assert_eq!(*canvas.image().get_pixel(50, 85), COVER);
    }

    #[test]
    fn test_read_rect_clips() {
        let canvas = RasterCanvas::solid(30, 30, COVER);
        let sample = canvas.read_rect(PixelRect {
            x: 20,
            y: -5,
            width: 20,
            height: 10,
        });
        assert_eq!(sample.dimensions(), (10, 5));
        let empty = canvas.read_rect(PixelRect {
            x: 0,
            y: 0,
            width: 0,
            height: 10,
        });
        assert_eq!(empty.dimensions(), (0, 0));
    }

    #[test]
    fn test_with_cover_resizes() {
        let cover = RgbaImage::from_pixel(10, 10, COVER);
        let canvas = RasterCanvas::with_cover(&cover, 40, 20);
        assert_eq!(canvas.size(), (40, 20));
        assert_eq!(*canvas.image().get_pixel(39, 19), COVER);
    }
}
