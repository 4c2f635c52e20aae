//! Automatic zig-zag sweep
//!
//! When an item completes, the remaining cover over a region is scraped off
//! along two diagonal zig-zag passes, one segment after another at a fixed
//! speed. Only one sweep runs at a time; later triggers wait their turn.

use std::collections::VecDeque;

use glam::Vec2;

use super::brush::ScratchBrush;
use super::events::{EventBus, GameEvent, SparkleTier};
use super::geom::Rect;
use super::raster::Canvas;
use super::surface::ScratchSurface;
use super::tween::Timeline;
use crate::consts::AUTO_SCRATCH_STEPS;

/// One straight leg of the sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl SweepSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Zig-zag path over `bounds`.
///
/// The first pass fans out from the left edge to the top edge, the second
/// from the bottom edge to the right edge. Each pass advances a fifth of
/// the region per leg and stops once it has stepped past the padded edge.
pub fn plot_sweep(bounds: Rect, padding: f32) -> Vec<SweepSegment> {
    if !(bounds.width > 0.0 && bounds.height > 0.0) || !bounds.x.is_finite() || !bounds.y.is_finite() {
        return Vec::new();
    }
    let step_x = bounds.width / AUTO_SCRATCH_STEPS;
    let step_y = bounds.height / AUTO_SCRATCH_STEPS;
    let left = bounds.x + padding;
    let top = bounds.y + padding;
    let right = bounds.right() - padding;
    let bottom = bounds.bottom() - padding;
    let mut segments = Vec::new();

    // Top-left pass
    let mut y = bounds.y + step_y;
    let mut x = left;
    loop {
        let start = Vec2::new(left, y);
        x += step_x;
        segments.push(SweepSegment {
            start,
            end: Vec2::new(x, top),
        });
        y += step_y;
        if y > bottom {
            break;
        }
    }

    // Bottom-right pass
    let mut x = bounds.x + step_x;
    let mut y = bounds.y;
    loop {
        let start = Vec2::new(x, bottom);
        y += step_y;
        segments.push(SweepSegment {
            start,
            end: Vec2::new(right, y),
        });
        x += step_x;
        if x > right {
            break;
        }
    }

    segments
}

#[derive(Debug, Clone)]
pub struct AutoScratch {
    brush: ScratchBrush,
    line_width: f32,
    padding: f32,
    /// Milliseconds of sweep per unit of path length
    ms_per_unit: f32,
    timeline: Option<Timeline>,
    queued: VecDeque<Rect>,
}

impl AutoScratch {
    /// `brush` is the sweep's own brush; the pointer brush is never moved
    pub fn new(brush: ScratchBrush, line_width: f32, padding: f32, ms_per_unit: f32) -> Self {
        Self {
            brush,
            line_width,
            padding,
            ms_per_unit,
            timeline: None,
            queued: VecDeque::new(),
        }
    }

    /// True from trigger until the last leg finishes
    pub fn is_active(&self) -> bool {
        self.timeline.is_some()
    }

    /// Sweeps waiting behind the active one
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Sweep `bounds`, now or after the current sweep
    pub fn trigger(&mut self, bounds: Rect, bus: &mut EventBus) {
        if self.is_active() {
            log::debug!("Auto-scratch busy, queueing {:?}", bounds);
            self.queued.push_back(bounds);
            return;
        }
        self.start(bounds, bus);
    }

    fn start(&mut self, bounds: Rect, bus: &mut EventBus) {
        let path = plot_sweep(bounds, self.padding);
        let Some(first) = path.first() else {
            log::debug!("Auto-scratch skipped empty region {:?}", bounds);
            return;
        };
        self.brush.initialize(first.start);
        let seconds_per_unit = self.ms_per_unit / 1000.0;
        self.timeline = Some(Timeline::sequence(
            path.iter()
                .map(|leg| (leg.start, leg.end, leg.length() * seconds_per_unit)),
        ));
        log::info!("Auto-scratch started over {:?} ({} legs)", bounds, path.len());
        bus.publish(GameEvent::AutoScratchStarted { bounds });
    }

    /// Advance the sweep by `dt` seconds, erasing along the way
    pub fn update<C: Canvas>(&mut self, dt: f32, surface: &mut ScratchSurface<C>, bus: &mut EventBus) {
        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };

        for update in timeline.advance(dt) {
            self.brush.update_position(update.position);
            surface.erase_line_with(&mut self.brush, self.line_width, None);
            bus.publish(GameEvent::SparkleRequested {
                position: update.position,
                tier: SparkleTier::Small,
            });
        }

        if timeline.is_finished() {
            self.timeline = None;
            log::info!("Auto-scratch finished");
            bus.publish(GameEvent::AutoScratchFinished);
            // Skip queued regions too small to sweep
            while let Some(next) = self.queued.pop_front() {
                self.start(next, bus);
                if self.is_active() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::raster::{CLEARED, RasterCanvas};
    use crate::sim::tracker::measure;
    use image::Rgba;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const COVER: Rgba<u8> = Rgba([30, 30, 30, 255]);

    fn setup(w: u32, h: u32) -> (ScratchSurface, AutoScratch) {
        let mut rng = Pcg32::seed_from_u64(5);
        let brush = ScratchBrush::new(LINE_WIDTH, BRISTLE_STROKE_WIDTH, &mut rng);
        let sweep = AutoScratch::new(
            brush.clone(),
            LINE_WIDTH,
            AUTO_SCRATCH_PADDING,
            AUTO_SCRATCH_MS_PER_UNIT,
        );
        (ScratchSurface::new(RasterCanvas::solid(w, h, COVER), brush), sweep)
    }

    fn run_to_end(sweep: &mut AutoScratch, surface: &mut ScratchSurface, bus: &mut EventBus) -> usize {
        let mut ticks = 0;
        while sweep.is_active() {
            sweep.update(SIM_DT, surface, bus);
            ticks += 1;
            assert!(ticks < 100_000, "sweep never finished");
        }
        ticks
    }

    #[test]
    fn test_plot_sweep_500() {
        let path = plot_sweep(Rect::new(0.0, 0.0, 500.0, 500.0), 15.0);
        // Five steps per pass; the fifth overshoots and ends the pass
        assert_eq!(path.len(), 8);

        let (a, b) = path.split_at(4);
        assert_eq!(a[0].start, Vec2::new(15.0, 100.0));
        assert_eq!(a[0].end, Vec2::new(115.0, 15.0));
        assert_eq!(a[3].start, Vec2::new(15.0, 400.0));
        assert_eq!(a[3].end, Vec2::new(415.0, 15.0));
        assert!(a.iter().all(|s| s.start.x == 15.0 && s.end.y == 15.0));

        assert_eq!(b[0].start, Vec2::new(100.0, 485.0));
        assert_eq!(b[0].end, Vec2::new(485.0, 100.0));
        assert_eq!(b[3].start, Vec2::new(400.0, 485.0));
        assert_eq!(b[3].end, Vec2::new(485.0, 400.0));
        assert!(b.iter().all(|s| s.start.y == 485.0 && s.end.x == 485.0));
    }

    #[test]
    fn test_plot_sweep_offset_region() {
        let region = Rect::new(266.0, 533.0, 267.0, 267.0);
        let path = plot_sweep(region, 15.0);
        assert!(!path.is_empty());
        for leg in &path {
            for p in [leg.start, leg.end] {
                assert!(region.contains(p), "{p} outside {region:?}");
            }
        }
    }

    #[test]
    fn test_plot_sweep_degenerate() {
        assert!(plot_sweep(Rect::new(0.0, 0.0, 0.0, 100.0), 15.0).is_empty());
        assert!(plot_sweep(Rect::new(0.0, 0.0, f32::NAN, 100.0), 15.0).is_empty());
    }

    #[test]
    fn test_sweep_runs_to_completion_and_clears() {
        let (mut surface, mut sweep) = setup(300, 300);
        let mut bus = EventBus::new();
        let region = Rect::new(0.0, 0.0, 300.0, 300.0);
        sweep.trigger(region, &mut bus);
        assert!(sweep.is_active());

        let ticks = run_to_end(&mut sweep, &mut surface, &mut bus);
        assert!(ticks > 1);
        assert!(!sweep.is_active());

        let events = bus.drain();
        assert!(matches!(events.first(), Some(GameEvent::AutoScratchStarted { .. })));
        assert_eq!(events.last(), Some(&GameEvent::AutoScratchFinished));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::SparkleRequested {
                tier: SparkleTier::Small,
                ..
            }
        )));
        assert!(measure(&surface, region) > 50.0);
        // Midpoint of the first leg
        assert_eq!(*surface.snapshot().get_pixel(45, 37), CLEARED);
    }

    #[test]
    fn test_duration_follows_path_length() {
        let (mut surface, mut sweep) = setup(500, 500);
        let mut bus = EventBus::new();
        let region = Rect::new(0.0, 0.0, 500.0, 500.0);
        let length: f32 = plot_sweep(region, 15.0).iter().map(SweepSegment::length).sum();
        sweep.trigger(region, &mut bus);
        let ticks = run_to_end(&mut sweep, &mut surface, &mut bus);
        let expected = length * AUTO_SCRATCH_MS_PER_UNIT / 1000.0 / SIM_DT;
        assert!((ticks as f32 - expected).abs() <= 2.0, "{ticks} vs {expected}");
    }

    #[test]
    fn test_second_trigger_waits() {
        let (mut surface, mut sweep) = setup(300, 300);
        let mut bus = EventBus::new();
        sweep.trigger(Rect::new(0.0, 0.0, 100.0, 100.0), &mut bus);
        sweep.trigger(Rect::new(200.0, 200.0, 100.0, 100.0), &mut bus);
        assert_eq!(sweep.queued(), 1);

        // Far corner untouched while the first sweep runs
        sweep.update(SIM_DT, &mut surface, &mut bus);
        assert_eq!(*surface.snapshot().get_pixel(250, 250), COVER);

        run_to_end(&mut sweep, &mut surface, &mut bus);
        assert_eq!(sweep.queued(), 0);
        let finished = bus
            .drain()
            .iter()
            .filter(|e| **e == GameEvent::AutoScratchFinished)
            .count();
        assert_eq!(finished, 2);
        assert!(measure(&surface, Rect::new(200.0, 200.0, 100.0, 100.0)) > 50.0);
    }

    #[test]
    fn test_empty_queued_region_does_not_stall_queue() {
        let (mut surface, mut sweep) = setup(300, 300);
        let mut bus = EventBus::new();
        sweep.trigger(Rect::new(0.0, 0.0, 100.0, 100.0), &mut bus);
        sweep.trigger(Rect::new(150.0, 0.0, 0.0, 100.0), &mut bus);
        sweep.trigger(Rect::new(200.0, 200.0, 100.0, 100.0), &mut bus);
        assert_eq!(sweep.queued(), 2);

        run_to_end(&mut sweep, &mut surface, &mut bus);
        assert_eq!(sweep.queued(), 0);
        let events = bus.drain();
        let started = events
            .iter()
            .filter(|e| matches!(e, GameEvent::AutoScratchStarted { .. }))
            .count();
        assert_eq!(started, 2);
        assert!(measure(&surface, Rect::new(200.0, 200.0, 100.0, 100.0)) > 50.0);
    }

    #[test]
    fn test_pointer_brush_untouched() {
        let (mut surface, mut sweep) = setup(200, 200);
        surface.brush_mut().initialize(Vec2::new(7.0, 7.0));
        let mut bus = EventBus::new();
        sweep.trigger(Rect::new(0.0, 0.0, 200.0, 200.0), &mut bus);
        run_to_end(&mut sweep, &mut surface, &mut bus);
        assert_eq!(surface.brush().position, Vec2::new(7.0, 7.0));
    }
}
