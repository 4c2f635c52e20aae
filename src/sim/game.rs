//! Scratch card session
//!
//! Wires pointer input, the cover surface, the prize grid, completion
//! tracking and the auto-scratch sweep together. Events are routed here and
//! also queued for the host to drain.

use glam::Vec2;
use image::RgbaImage;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::auto_scratch::AutoScratch;
use super::brush::ScratchBrush;
use super::events::{EventBus, GameEvent};
use super::grid::{GridError, Outcome, ScratchGrid};
use super::raster::{Canvas, RasterCanvas};
use super::surface::ScratchSurface;
use super::tracker::CompletionTracker;
use crate::consts::*;
use crate::settings::{AutoScratchScope, BrushStyle, Settings, SettingsError};

/// Cover color used when no cover image is given
const DEFAULT_COVER: image::Rgba<u8> = image::Rgba([178, 178, 178, 255]);

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("could not deal a card: {0}")]
    Grid(#[from] GridError),
}

/// Seed of the card's random stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One pointer sample from the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    pub is_down: bool,
}

pub struct ScratchGame<C: Canvas = RasterCanvas> {
    settings: Settings,
    rng_state: RngState,
    surface: ScratchSurface<C>,
    grid: ScratchGrid,
    tracker: CompletionTracker,
    auto_scratch: AutoScratch,
    bus: EventBus,
    /// Routed events waiting for the host
    outbox: Vec<GameEvent>,
    /// A stroke was begun by `pointer_down` and not yet released
    stroke_active: bool,
    surface_swept: bool,
    accumulator: f32,
    time_ticks: u64,
}

impl ScratchGame<RasterCanvas> {
    /// Deal a card on a raster cover of the configured size.
    ///
    /// `cover` is stretched over the play area; without one the cover is a
    /// flat opaque grey.
    pub fn new(settings: Settings, cover: Option<&RgbaImage>) -> Result<Self, GameError> {
        let canvas = match cover {
            Some(image) => RasterCanvas::with_cover(image, settings.width, settings.height),
            None => RasterCanvas::solid(settings.width, settings.height, DEFAULT_COVER),
        };
        Self::with_canvas(settings, canvas)
    }
}

impl<C: Canvas> ScratchGame<C> {
    /// Deal a card on a host-provided canvas
    pub fn with_canvas(settings: Settings, canvas: C) -> Result<Self, GameError> {
        settings.validate()?;
        let rng_state = RngState::new(settings.resolve_seed());
        let mut rng = rng_state.to_rng();

        let brush = ScratchBrush::new(settings.line_width, settings.bristle_stroke_width, &mut rng);
        let auto_scratch = AutoScratch::new(
            brush.clone(),
            settings.line_width,
            settings.auto_scratch_padding,
            settings.auto_scratch_ms_per_unit,
        );
        let surface = ScratchSurface::new(canvas, brush);

        let mut grid = ScratchGrid::new(surface.bounds(), settings.win_percentage);
        let outcome = grid.generate(&mut rng)?;
        log::info!(
            "New card: seed {} {}x{} -> {:?}",
            rng_state.seed,
            surface.size().0,
            surface.size().1,
            outcome
        );

        let tracker = CompletionTracker::new(settings.hit_box, settings.auto_complete_percent);
        Ok(Self {
            settings,
            rng_state,
            surface,
            grid,
            tracker,
            auto_scratch,
            bus: EventBus::new(),
            outbox: Vec::new(),
            stroke_active: false,
            surface_swept: false,
            accumulator: 0.0,
            time_ticks: 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn grid(&self) -> &ScratchGrid {
        &self.grid
    }

    pub fn surface(&self) -> &ScratchSurface<C> {
        &self.surface
    }

    pub fn outcome(&self) -> Outcome {
        self.grid.outcome()
    }

    pub fn items_complete(&self) -> usize {
        self.grid.items_complete()
    }

    pub fn is_auto_scratching(&self) -> bool {
        self.auto_scratch.is_active()
    }

    /// Fixed ticks simulated so far
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Press: start a new stroke at `position`
    pub fn pointer_down(&mut self, position: Vec2) {
        if !position.is_finite() {
            log::warn!("Ignoring pointer down at {}", position);
            return;
        }
        self.surface.brush_mut().initialize(position);
        self.surface.begin_stroke(None);
        self.stroke_active = true;
    }

    /// Move: follow the pointer, erasing while it is pressed
    pub fn pointer_move(&mut self, input: PointerInput) {
        let position = input.position;
        if !position.is_finite() {
            log::warn!("Ignoring pointer move to {}", position);
            return;
        }
        if !input.is_down {
            self.stroke_active = false;
            self.surface.brush_mut().update_position(position);
            return;
        }
        if !self.stroke_active {
            log::warn!("Pointer dragged without a press, ignoring {}", position);
            return;
        }

        self.surface.brush_mut().update_position(position);
        match self.settings.brush_style {
            BrushStyle::Line => self.surface.erase_line(None),
            BrushStyle::Bristles => self.surface.erase_bristles(None),
        }
        self.bus.publish(GameEvent::Scratched { position });
        self.dispatch();
    }

    /// Release: end the current stroke
    pub fn pointer_up(&mut self) {
        self.stroke_active = false;
    }

    /// Advance by a frame's worth of wall time using fixed substeps.
    ///
    /// Returns the number of substeps run.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Advance the simulation by exactly one fixed step
    pub fn tick(&mut self) {
        self.time_ticks += 1;
        self.auto_scratch
            .update(SIM_DT, &mut self.surface, &mut self.bus);
        self.dispatch();
    }

    /// Take every event routed since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Route queued events until the bus is empty
    fn dispatch(&mut self) {
        while let Some(event) = self.bus.pop() {
            match &event {
                GameEvent::Scratched { position } => {
                    self.tracker
                        .on_scratched(*position, &mut self.grid, &self.surface, &mut self.bus);
                }
                GameEvent::ItemCompleted { bounds, .. } => match self.settings.auto_scratch_scope {
                    AutoScratchScope::Item => self.auto_scratch.trigger(*bounds, &mut self.bus),
                    AutoScratchScope::Surface => {
                        if !self.surface_swept {
                            self.surface_swept = true;
                            let whole = self.surface.bounds();
                            self.auto_scratch.trigger(whole, &mut self.bus);
                        }
                    }
                },
                _ => {}
            }
            self.outbox.push(event);
        }
    }
}
