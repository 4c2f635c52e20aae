//! Completion tracking
//!
//! After each scratch, re-measures the cells near the scratch point by
//! counting fully cleared pixels over each cell's whole area. Cells past the
//! auto-complete threshold snap to 100%.

use glam::Vec2;
use image::RgbaImage;

use super::events::{EventBus, GameEvent, SparkleTier};
use super::geom::Rect;
use super::grid::ScratchGrid;
use super::raster::{CLEARED, Canvas};
use super::surface::ScratchSurface;

/// Number of pixels that are exactly transparent black
pub fn cleared_pixels(sample: &RgbaImage) -> u64 {
    sample.pixels().filter(|p| **p == CLEARED).count() as u64
}

/// Percentage (0 - 100) of `bounds` that has been fully cleared
pub fn measure<C: Canvas>(surface: &ScratchSurface<C>, bounds: Rect) -> f32 {
    let area = bounds.to_pixels().area();
    if area == 0 {
        return 0.0;
    }
    let cleared = cleared_pixels(&surface.sample_pixels(bounds));
    if cleared == 0 {
        return 0.0;
    }
    cleared as f32 / area as f32 * 100.0
}

#[derive(Debug, Clone)]
pub struct CompletionTracker {
    hit_box: f32,
    auto_complete_percent: f32,
    win_announced: bool,
    card_announced: bool,
}

impl CompletionTracker {
    pub fn new(hit_box: f32, auto_complete_percent: f32) -> Self {
        Self {
            hit_box,
            auto_complete_percent,
            win_announced: false,
            card_announced: false,
        }
    }

    /// Forget announcements (new card)
    pub fn reset(&mut self) {
        self.win_announced = false;
        self.card_announced = false;
    }

    /// Update cells touched by a scratch at `point`.
    ///
    /// Returns the rise in mean card completion, in percentage points. A cell
    /// that auto-completes contributes its raw reading to that rise.
    pub fn on_scratched<C: Canvas>(
        &mut self,
        point: Vec2,
        grid: &mut ScratchGrid,
        surface: &ScratchSurface<C>,
        bus: &mut EventBus,
    ) -> f32 {
        let hit_box = Rect::centered(point, self.hit_box);
        let before = grid.mean_percent();
        // Re-measured cells count with their raw reading, not the snapped 100
        let mut after_total = 0.0;

        for (index, cell) in grid.cells_mut().iter_mut().enumerate() {
            if cell.is_complete() || !hit_box.intersects(&cell.bounds) {
                after_total += cell.percent_complete();
                continue;
            }
            let fresh = measure(surface, cell.bounds);
            after_total += fresh;
            if fresh > self.auto_complete_percent {
                cell.raise_percent(100.0);
                log::info!("Item {} completed ({:.1}% scratched)", index, fresh);
                bus.publish(GameEvent::ItemCompleted {
                    index,
                    bounds: cell.bounds,
                });
            } else {
                cell.raise_percent(fresh);
            }
        }

        let after = after_total / grid.cells().len() as f32;
        let delta = after - before;
        if delta > 0.0 {
            let tier = SparkleTier::for_progress(delta / 100.0);
            log::debug!("Card progress +{:.3} ({:?})", delta, tier);
            bus.publish(GameEvent::ScratchPercentIncreased {
                position: point,
                delta,
                tier,
            });
        }

        self.check_reveal(grid, bus);
        delta.max(0.0)
    }

    fn check_reveal(&mut self, grid: &ScratchGrid, bus: &mut EventBus) {
        if !self.win_announced {
            if let Some(item) = grid.winner() {
                let revealed = grid
                    .cells()
                    .iter()
                    .filter(|c| c.item == Some(item))
                    .all(|c| c.is_complete());
                if revealed {
                    self.win_announced = true;
                    log::info!("Winning {} revealed", item.as_str());
                    bus.publish(GameEvent::WinRevealed { item });
                }
            }
        }

        if !self.card_announced && grid.items_complete() == grid.cells().len() {
            self.card_announced = true;
            let outcome = grid.outcome();
            log::info!("Card fully revealed: {:?}", outcome);
            bus.publish(GameEvent::CardRevealed { outcome });
        }
    }
}
