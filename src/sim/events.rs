//! Game events
//!
//! Components never call each other directly; they publish events here and
//! the session routes them (`ItemCompleted` drives the auto-scratch sweep).
//! Everything published is also kept for the host to drain and turn into
//! particles, sound or UI.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::grid::{ItemKind, Outcome};
use crate::consts::{LARGE_PROGRESS, SMALL_PROGRESS};

/// Strength of scratch feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SparkleTier {
    Small,
    Medium,
    Large,
}

impl SparkleTier {
    /// Tier for a progress increase expressed as a fraction of the whole card
    pub fn for_progress(fraction: f32) -> Self {
        if fraction > LARGE_PROGRESS {
            SparkleTier::Large
        } else if fraction < SMALL_PROGRESS {
            SparkleTier::Small
        } else {
            SparkleTier::Medium
        }
    }

    /// Particles to emit for this tier
    pub fn amount(&self) -> f32 {
        match self {
            SparkleTier::Small => 1.5,
            SparkleTier::Medium => 3.0,
            SparkleTier::Large => 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The pointer erased cover around `position`
    Scratched { position: Vec2 },
    /// Mean card completion rose by `delta` percentage points (0 - 100 scale);
    /// `tier` is chosen on `delta / 100`, so half of one cell (~5.6) is Medium
    ScratchPercentIncreased {
        position: Vec2,
        delta: f32,
        tier: SparkleTier,
    },
    /// A cell crossed the auto-complete threshold
    ItemCompleted { index: usize, bounds: Rect },
    /// Feedback request from a scripted sweep step
    SparkleRequested { position: Vec2, tier: SparkleTier },
    /// An auto-scratch sweep started or finished
    AutoScratchStarted { bounds: Rect },
    AutoScratchFinished,
    /// Every cell of the winning item is revealed
    WinRevealed { item: ItemKind },
    /// Every cell is revealed
    CardRevealed { outcome: Outcome },
}

/// FIFO event queue
#[derive(Debug, Default)]
pub struct EventBus {
    pending: VecDeque<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Take everything published so far, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(SparkleTier::for_progress(0.2), SparkleTier::Large);
        assert_eq!(SparkleTier::for_progress(0.1), SparkleTier::Medium);
        assert_eq!(SparkleTier::for_progress(0.05), SparkleTier::Medium);
        assert_eq!(SparkleTier::for_progress(0.01), SparkleTier::Small);
        assert_eq!(SparkleTier::Large.amount(), 6.0);
    }

    #[test]
    fn test_bus_is_fifo() {
        let mut bus = EventBus::new();
        bus.publish(GameEvent::AutoScratchFinished);
        bus.publish(GameEvent::Scratched {
            position: Vec2::ONE,
        });
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.pop(), Some(GameEvent::AutoScratchFinished));
        assert_eq!(bus.drain().len(), 1);
        assert!(bus.is_empty());
    }
}
