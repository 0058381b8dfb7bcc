use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::grid::{Cell, Grid};

/// Uniform draws attempted before falling back to scanning for free cells
const MAX_RANDOM_DRAWS: usize = 64;

const SHIMMER_STEP: f32 = 0.2;
const SHIMMER_LIMIT: f32 = 3.0;

/// Pick a uniformly random grid cell that is not in `occupied`.
///
/// Returns `None` only when every cell of the grid is occupied.
pub fn place_random<R: Rng + ?Sized>(
    grid: &Grid,
    occupied: &HashSet<Cell>,
    rng: &mut R,
) -> Option<Cell> {
    for _ in 0..MAX_RANDOM_DRAWS {
        let x = rng.gen_range(0..grid.width) as i32;
        let y = rng.gen_range(0..grid.height) as i32;
        let candidate = Cell::new(x, y);

        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }

    // A crowded board; choose among what is left
    let free: Vec<Cell> = grid.cells().filter(|c| !occupied.contains(c)).collect();
    free.choose(rng).copied()
}

/// The food pellet and its shimmer animation
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    position: Cell,
    shimmer_offset: f32,
    shimmer_direction: f32,
}

impl Food {
    pub fn new(position: Cell) -> Self {
        Self {
            position,
            shimmer_offset: 0.0,
            shimmer_direction: 1.0,
        }
    }

    /// Place food on a random cell not covered by `segments`
    pub fn spawn<R: Rng + ?Sized>(
        grid: &Grid,
        segments: impl IntoIterator<Item = Cell>,
        rng: &mut R,
    ) -> Self {
        let occupied: HashSet<Cell> = segments.into_iter().collect();
        let position = place_random(grid, &occupied, rng).unwrap_or_else(|| grid.center());
        Self::new(position)
    }

    /// Move the food off the snake. Returns false if the snake covers the
    /// whole board, in which case the food stays where it is.
    pub fn relocate_away_from<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        segments: impl IntoIterator<Item = Cell>,
        rng: &mut R,
    ) -> bool {
        let occupied: HashSet<Cell> = segments.into_iter().collect();
        match place_random(grid, &occupied, rng) {
            Some(cell) => {
                self.position = cell;
                true
            }
            None => false,
        }
    }

    /// Advance the shimmer by one frame
    pub fn update_shimmer(&mut self) {
        self.shimmer_offset += SHIMMER_STEP * self.shimmer_direction;
        if self.shimmer_offset.abs() > SHIMMER_LIMIT {
            self.shimmer_direction = -self.shimmer_direction;
        }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Current shimmer offset, oscillating roughly within [-3, 3]
    pub fn shimmer_offset(&self) -> f32 {
        self.shimmer_offset
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, cell: Cell) {
        self.position = cell;
    }
}
