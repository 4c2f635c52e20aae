//! Game settings
//!
//! Loaded from an optional JSON file; every field falls back to the defaults
//! of the shipped card.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("win percentage must be within [0, 1], got {0}")]
    WinPercentage(f32),
    #[error("play area must be between 1x1 and {max}x{max}, got {width}x{height}", max = MAX_PLAY_AREA)]
    PlayArea { width: u32, height: u32 },
    #[error("auto-complete percent must be within [0, 100), got {0}")]
    AutoCompletePercent(f32),
    #[error("auto-scratch padding must be non-negative, got {0}")]
    Padding(f32),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}

/// How pointer drags are rendered onto the cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BrushStyle {
    /// Single thick, slightly blurred line
    #[default]
    Line,
    /// Fan of thin bristles with angle smoothing
    Bristles,
}

impl BrushStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrushStyle::Line => "Line",
            BrushStyle::Bristles => "Bristles",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "line" => Some(BrushStyle::Line),
            "bristles" | "bristle" => Some(BrushStyle::Bristles),
            _ => None,
        }
    }
}

/// Region swept once an item completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AutoScratchScope {
    /// Only the completed item's cell
    #[default]
    Item,
    /// The whole play area
    Surface,
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play area ===
    pub width: u32,
    pub height: u32,

    // === Odds ===
    /// Probability that a card is generated as a winner (0.0 - 1.0)
    pub win_percentage: f32,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,

    // === Brush ===
    pub brush_style: BrushStyle,
    /// Width of the simple line stroke
    pub line_width: f32,
    /// Total width of the bristle fan
    pub bristle_stroke_width: f32,

    // === Completion ===
    /// Side of the square hit box around each scratch point
    pub hit_box: f32,
    /// Raw percentage above which an item snaps to complete
    pub auto_complete_percent: f32,

    // === Auto-scratch ===
    pub auto_scratch_scope: AutoScratchScope,
    /// Inset keeping the sweep off the exact edges
    pub auto_scratch_padding: f32,
    /// Milliseconds per unit of path length
    pub auto_scratch_ms_per_unit: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCENE_WIDTH,
            height: SCENE_HEIGHT,

            win_percentage: 0.5,
            seed: None,

            brush_style: BrushStyle::Line,
            line_width: LINE_WIDTH,
            bristle_stroke_width: BRISTLE_STROKE_WIDTH,

            hit_box: SCRATCH_HIT_BOX,
            auto_complete_percent: AUTO_COMPLETE_PERCENT,

            auto_scratch_scope: AutoScratchScope::Item,
            auto_scratch_padding: AUTO_SCRATCH_PADDING,
            auto_scratch_ms_per_unit: AUTO_SCRATCH_MS_PER_UNIT,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the game core relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.win_percentage) {
            return Err(SettingsError::WinPercentage(self.win_percentage));
        }
        let side = 1..=MAX_PLAY_AREA;
        if !side.contains(&self.width) || !side.contains(&self.height) {
            return Err(SettingsError::PlayArea {
                width: self.width,
                height: self.height,
            });
        }
        let positive = [
            ("line_width", self.line_width),
            ("bristle_stroke_width", self.bristle_stroke_width),
            ("hit_box", self.hit_box),
            ("auto_scratch_ms_per_unit", self.auto_scratch_ms_per_unit),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SettingsError::NonPositive { name, value });
            }
        }
        if !(0.0..100.0).contains(&self.auto_complete_percent) {
            return Err(SettingsError::AutoCompletePercent(self.auto_complete_percent));
        }
        if !(self.auto_scratch_padding >= 0.0 && self.auto_scratch_padding.is_finite()) {
            return Err(SettingsError::Padding(self.auto_scratch_padding));
        }
        Ok(())
    }

    /// Seed to use for this card (drawn from the OS when unset)
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
