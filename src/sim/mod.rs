//! Deterministic scratch card core
//!
//! All gameplay logic lives here:
//! - Brush strokes erase into a `Canvas`, never drawn directly by the host
//! - Seeded RNG only (card layout, bristle fan)
//! - Fixed timestep for scripted sweeps
//! - No windowing or asset dependencies

pub mod auto_scratch;
pub mod brush;
pub mod events;
pub mod game;
pub mod geom;
pub mod grid;
pub mod raster;
pub mod surface;
pub mod tracker;
pub mod tween;

pub use auto_scratch::{AutoScratch, SweepSegment, plot_sweep};
pub use brush::{Bristle, ScratchBrush, make_bristles};
pub use events::{EventBus, GameEvent, SparkleTier};
pub use game::{GameError, PointerInput, RngState, ScratchGame};
pub use geom::{PixelRect, Rect};
pub use grid::{GridCell, GridError, ItemKind, Outcome, ScratchGrid};
pub use raster::{CLEARED, Canvas, ERASE_COLOR, EraseStyle, RasterCanvas};
pub use surface::ScratchSurface;
pub use tracker::{CompletionTracker, cleared_pixels, measure};
pub use tween::{Timeline, Tween, TweenUpdate};
