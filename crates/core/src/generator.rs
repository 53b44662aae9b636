//! Tile generator - refills the grid without creating immediate matches

use log::warn;

use crate::grid::Grid;
use crate::matcher::completes_run;
use crate::rng::SimpleRng;
use crate::sequence::NewTile;
use crate::types::{Pos, Tile};

/// Draws gem colors from the engine's RNG stream
#[derive(Debug, Clone)]
pub struct TileGenerator {
    rng: SimpleRng,
    colors: u8,
}

impl TileGenerator {
    pub fn new(seed: u64, colors: u8) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            colors,
        }
    }

    /// Uniform color over the palette
    pub fn pick(&mut self) -> u8 {
        self.rng.next_range(u32::from(self.colors)) as u8
    }

    /// First color of a random palette permutation that completes no run at `pos`
    ///
    /// Only already-filled cells are considered. Falls back to [`pick`](Self::pick)
    /// when every color would match.
    pub fn pick_safe(&mut self, grid: &Grid, pos: Pos) -> u8 {
        let mut palette: Vec<u8> = (0..self.colors).collect();
        self.rng.shuffle(&mut palette);

        if let Some(&color) = palette.iter().find(|&&c| !completes_run(grid, pos, c)) {
            return color;
        }

        warn!(
            "no safe color at ({}, {}); placing a matching tile",
            pos.row, pos.col
        );
        self.pick()
    }

    /// Fill every cell in row-major order with `pick_safe`
    pub fn fill_initial(&mut self, grid: &mut Grid) {
        let positions: Vec<Pos> = grid.positions().collect();
        for &pos in &positions {
            grid.set(pos, None);
        }
        for pos in positions {
            let color = self.pick_safe(grid, pos);
            grid.set(pos, Some(Tile::gem(color)));
        }
    }

    /// Fill every empty cell, row-major, returning the placed tiles
    pub fn fill_empties(&mut self, grid: &mut Grid) -> Vec<NewTile> {
        let empties: Vec<Pos> = grid
            .positions()
            .filter(|&p| grid.get(p) == Some(None))
            .collect();

        let mut spawned = Vec::with_capacity(empties.len());
        for pos in empties {
            let tile = Tile::gem(self.pick_safe(grid, pos));
            grid.set(pos, Some(tile));
            spawned.push(NewTile { to: pos, tile });
        }
        spawned
    }

    /// The shared RNG stream (the reshuffler draws from it too)
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }
}
