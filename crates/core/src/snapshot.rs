use crate::grid::Grid;
use crate::types::{Cell, Pos};

/// Plain copy of the engine state for observers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GridSnapshot {
    pub size: usize,
    pub colors: u8,
    pub seed: u64,
    pub score: u32,
    pub moves: u32,
    /// Row-major cells, `size * size` long
    pub cells: Vec<Cell>,
}

impl GridSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.colors = 0;
        self.seed = 0;
        self.score = 0;
        self.moves = 0;
        self.cells.clear();
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        self.cells.get(pos.index(self.size)).copied().flatten()
    }

    /// Copy `grid`'s cells, reusing the existing allocation
    pub fn write_grid(&mut self, grid: &Grid) {
        self.size = grid.size();
        self.cells.clear();
        self.cells.extend_from_slice(grid.cells());
    }

    /// Rebuild a grid from the snapshot
    pub fn to_grid(&self) -> Grid {
        let mut grid = Grid::new(self.size);
        for (i, &cell) in self.cells.iter().enumerate().take(self.size * self.size) {
            grid.set(Pos::from_index(i, self.size), cell);
        }
        grid
    }
}
