//! Grid module - the NxN board of tiles
//!
//! The grid is square, row-major, and stored as a flat vector for cache locality.
//! Coordinates: [`Pos`] `(row, col)`, row 0 at the top. Gravity pulls toward the
//! highest row index.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::GridParseError;
use crate::types::{Cell, Color, Pos, Tile};

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with every cell empty
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some(pos.index(self.size))
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`
    /// Returns None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile at `pos`, `None` when empty or out of bounds
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.get(pos).flatten()
    }

    /// Color a run detector sees at `pos` (wildcards and empties see nothing)
    pub fn match_color(&self, pos: Pos) -> Option<u8> {
        self.tile(pos).and_then(|t| t.match_color())
    }

    /// Set cell at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Remove and return the tile at `pos`
    pub fn take(&mut self, pos: Pos) -> Cell {
        match self.index(pos) {
            Some(idx) => self.cells[idx].take(),
            None => None,
        }
    }

    /// Exchange two cells; false if either is out of bounds
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// In-bounds 4-neighbours in order: up, right, down, left
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        if pos.row > 0 {
            out.push(Pos::new(pos.row - 1, pos.col));
        }
        if pos.col + 1 < self.size {
            out.push(Pos::new(pos.row, pos.col + 1));
        }
        if pos.row + 1 < self.size {
            out.push(Pos::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            out.push(Pos::new(pos.row, pos.col - 1));
        }
        out
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let size = self.size;
        (0..size * size).map(move |i| Pos::from_index(i, size))
    }

    /// Positions holding a tile whose match color is `color`
    pub fn positions_of(&self, color: u8) -> Vec<Pos> {
        self.positions()
            .filter(|&p| self.match_color(p) == Some(color))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Parse rows of grid notation: `A`..`H` gems, `*` rainbow, `.` empty.
    /// Whitespace inside a row is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use gemfall_core::Grid;
    /// use gemfall_core::types::{Pos, Special};
    ///
    /// let grid = Grid::parse(&["AB*.", "BACD", "CDAB", "DCBA"]).unwrap();
    /// assert_eq!(grid.size(), 4);
    /// assert_eq!(grid.match_color(Pos::new(0, 1)), Some(1));
    /// assert_eq!(grid.tile(Pos::new(0, 2)).unwrap().special, Special::Rainbow);
    /// assert_eq!(grid.get(Pos::new(0, 3)), Some(None));
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Self, GridParseError> {
        if rows.is_empty() {
            return Err(GridParseError::Empty);
        }
        let size = rows.len();
        let mut grid = Grid::new(size);

        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size {
                return Err(GridParseError::NotSquare {
                    row,
                    expected: size,
                    found: symbols.len(),
                });
            }
            for (col, &symbol) in symbols.iter().enumerate() {
                let cell = match symbol {
                    '.' => None,
                    _ => match Color::from_symbol(symbol) {
                        Some(Color::Wildcard) => Some(Tile::rainbow()),
                        Some(Color::Gem(c)) => Some(Tile::gem(c)),
                        None => return Err(GridParseError::UnknownSymbol { symbol, row, col }),
                    },
                };
                grid.set(Pos::new(row, col), cell);
            }
        }

        Ok(grid)
    }

    /// Render back to grid notation (specials other than rainbow are not shown)
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| match self.tile(Pos::new(row, col)) {
                        Some(tile) => tile.color.symbol(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.to_rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}
