//! Prize grid generation
//!
//! Nine cells laid over the play area, each hiding one of six items. A card
//! is decided up front: a winner has exactly one item on exactly three
//! cells, a loser has no item on three or more.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;

/// Prize identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Banana,
    Cherry,
    Apple,
    Mango,
    Orange,
    Pineapple,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Banana,
        ItemKind::Cherry,
        ItemKind::Apple,
        ItemKind::Mango,
        ItemKind::Orange,
        ItemKind::Pineapple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Banana => "banana",
            ItemKind::Cherry => "cherry",
            ItemKind::Apple => "apple",
            ItemKind::Mango => "mango",
            ItemKind::Orange => "orange",
            ItemKind::Pineapple => "pineapple",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Result of a generated card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(ItemKind),
    Lose,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("win percentage must be within [0, 1], got {0}")]
    InvalidWinPercentage(f32),
}

/// One prize cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub bounds: Rect,
    pub item: Option<ItemKind>,
    /// 0 - 100; only ever raised
    percent_complete: f32,
}

impl GridCell {
    fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            item: None,
            percent_complete: 0.0,
        }
    }

    pub fn percent_complete(&self) -> f32 {
        self.percent_complete
    }

    pub fn is_complete(&self) -> bool {
        self.percent_complete >= 100.0
    }

    /// Raise completion to `percent` (never lowers it)
    pub(super) fn raise_percent(&mut self, percent: f32) {
        if percent > self.percent_complete {
            self.percent_complete = percent.min(100.0);
        }
    }
}

/// The 3x3 prize grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchGrid {
    cells: Vec<GridCell>,
    win_percentage: f32,
    winner: Option<ItemKind>,
}

impl ScratchGrid {
    /// Empty grid dividing `area` into thirds (cell edges snapped to whole pixels)
    pub fn new(area: Rect, win_percentage: f32) -> Self {
        let edge = |origin: f32, span: f32, i: usize| (origin + span * i as f32 / 3.0).floor();
        let mut cells = Vec::with_capacity(CELL_COUNT);
        for row in 0..GRID_ROWS {
            let y0 = edge(area.y, area.height, row);
            let y1 = edge(area.y, area.height, row + 1);
            for col in 0..GRID_COLUMNS {
                let x0 = edge(area.x, area.width, col);
                let x1 = edge(area.x, area.width, col + 1);
                cells.push(GridCell::new(Rect::new(x0, y0, x1 - x0, y1 - y0)));
            }
        }
        Self {
            cells,
            win_percentage,
            winner: None,
        }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub(super) fn cells_mut(&mut self) -> &mut [GridCell] {
        &mut self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    /// Index of the cell containing `point`, if any
    pub fn cell_at(&self, point: glam::Vec2) -> Option<usize> {
        self.cells.iter().position(|c| c.bounds.contains(point))
    }

    pub fn winner(&self) -> Option<ItemKind> {
        self.winner
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner {
            Some(item) => Outcome::Win(item),
            None => Outcome::Lose,
        }
    }

    /// Number of completed cells
    pub fn items_complete(&self) -> usize {
        self.cells.iter().filter(|c| c.is_complete()).count()
    }

    /// Mean completion over all cells (0 - 100)
    pub fn mean_percent(&self) -> f32 {
        self.cells.iter().map(|c| c.percent_complete).sum::<f32>() / self.cells.len() as f32
    }

    /// Remove every item and reset progress
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.item = None;
            cell.percent_complete = 0.0;
        }
        self.winner = None;
    }

    /// Occurrences of each item, indexed like `ItemKind::ALL`
    fn counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for item in self.cells.iter().filter_map(|c| c.item) {
            counts[item.index()] += 1;
        }
        counts
    }

    /// Number of items placed on at least three cells
    pub fn win_count(&self) -> usize {
        self.counts().iter().filter(|&&n| n >= WIN_RUN).count()
    }

    /// Decide win or lose with the configured odds and lay out the items
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Outcome, GridError> {
        if !(0.0..=1.0).contains(&self.win_percentage) {
            return Err(GridError::InvalidWinPercentage(self.win_percentage));
        }
        let is_winner = rng.random::<f32>() < self.win_percentage;
        let outcome = if is_winner {
            Outcome::Win(self.generate_win(rng)?)
        } else {
            self.generate_lose(rng)?;
            Outcome::Lose
        };
        log::debug!("Generated card: {:?}", outcome);
        Ok(outcome)
    }

    /// Place one item on exactly three random cells and fill the rest
    /// without forming a second run
    pub fn generate_win<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ItemKind, GridError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            self.clear();
            let winning = random_item(rng, &[]).unwrap_or(ItemKind::Banana);
            for index in rand::seq::index::sample(rng, self.cells.len(), WIN_RUN).iter() {
                self.cells[index].item = Some(winning);
            }

            if self.try_fill(1, &[winning], rng) {
                self.winner = Some(winning);
                return Ok(winning);
            }
            log::debug!("Win fill failed on attempt {}", attempt);
        }
        log::warn!("Win generation exhausted");
        Err(GridError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Fill every cell without any item reaching three
    pub fn generate_lose<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GridError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            self.clear();
            if self.try_fill(0, &[], rng) {
                return Ok(());
            }
            log::debug!("Lose fill failed on attempt {}", attempt);
        }
        log::warn!("Lose generation exhausted");
        Err(GridError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Fill empty cells one at a time, rejecting picks that push the number
    /// of runs past `allowed_win_count`. Each cell excludes `base_exclusions`
    /// plus its own rejected picks; running out of candidates fails the fill.
    pub fn try_fill<R: Rng + ?Sized>(
        &mut self,
        allowed_win_count: usize,
        base_exclusions: &[ItemKind],
        rng: &mut R,
    ) -> bool {
        for index in 0..self.cells.len() {
            if self.cells[index].item.is_some() {
                continue;
            }
            let mut excluded = base_exclusions.to_vec();
            loop {
                let Some(pick) = random_item(rng, &excluded) else {
                    self.cells[index].item = None;
                    return false;
                };
                self.cells[index].item = Some(pick);
                if self.win_count() <= allowed_win_count {
                    break;
                }
                excluded.push(pick);
            }
        }
        true
    }
}

/// Uniform pick among items not in `exclude`
fn random_item<R: Rng + ?Sized>(rng: &mut R, exclude: &[ItemKind]) -> Option<ItemKind> {
    let candidates: Vec<ItemKind> = ItemKind::ALL
        .iter()
        .copied()
        .filter(|item| !exclude.contains(item))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}
