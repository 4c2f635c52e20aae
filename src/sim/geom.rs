//! Axis-aligned rectangles in play-area space
//!
//! `Rect` is the float rectangle used for cell bounds, hit boxes and sweep
//! regions. `PixelRect` is its snapped counterpart used for raster access.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Float rectangle (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Overlap test with inclusive edges (touching rectangles intersect)
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.bottom() < other.y
            || self.x > other.right()
            || self.y > other.bottom())
    }

    /// Snap to whole pixels. Adjacent rectangles snap to adjacent pixel
    /// rectangles with no gap or overlap.
    pub fn to_pixels(&self) -> PixelRect {
        let x0 = self.x.floor();
        let y0 = self.y.floor();
        let x1 = self.right().floor();
        let y1 = self.bottom().floor();
        PixelRect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0).max(0.0) as u32,
            height: (y1 - y0).max(0.0) as u32,
        }
    }
}

/// Integer pixel rectangle; may extend past the raster and is clipped on use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersection with a `width x height` raster anchored at the origin
    pub fn clip(&self, width: u32, height: u32) -> PixelRect {
        let x0 = (self.x as i64).clamp(0, width as i64);
        let y0 = (self.y as i64).clamp(0, height as i64);
        let x1 = (self.x as i64 + self.width as i64).clamp(0, width as i64);
        let y1 = (self.y as i64 + self.height as i64).clamp(0, height as i64);
        PixelRect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0).max(0) as u32,
            height: (y1 - y0).max(0) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_inclusive_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.1, 0.0, 5.0, 5.0)));
        assert!(a.intersects(&Rect::new(-5.0, -5.0, 30.0, 30.0)));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 50.0);
        assert_eq!(r, Rect::new(75.0, 25.0, 50.0, 50.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_to_pixels_snaps_both_edges() {
        let r = Rect::new(10.5, 20.25, 100.0, 50.5).to_pixels();
        assert_eq!(
            r,
            PixelRect {
                x: 10,
                y: 20,
                width: 100,
                height: 50
            }
        );
        assert!(Rect::new(5.0, 5.0, 0.0, 10.0).to_pixels().is_empty());
    }

    #[test]
    fn test_clip() {
        let r = PixelRect {
            x: -5,
            y: 90,
            width: 20,
            height: 20,
        };
        let c = r.clip(100, 100);
        assert_eq!(
            c,
            PixelRect {
                x: 0,
                y: 90,
                width: 15,
                height: 10
            }
        );
        let outside = PixelRect {
            x: 200,
            y: 0,
            width: 5,
            height: 5,
        };
        assert!(outside.clip(100, 100).is_empty());
    }
}
