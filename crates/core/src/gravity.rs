//! Gravity - collapse columns after an elimination

use crate::grid::Grid;
use crate::sequence::FallMove;
use crate::types::Pos;

/// Pull every tile down as far as it goes, column by column
///
/// Each column is walked bottom-up with a write cursor; a tile whose row
/// differs from the cursor is relocated and recorded. Afterwards every empty
/// cell of a column sits above all of its tiles. Moves are listed column by
/// column, bottom tile first.
pub fn collapse(grid: &mut Grid) -> Vec<FallMove> {
    let size = grid.size();
    let mut moves = Vec::new();

    for col in 0..size {
        let mut cursor = size;
        for row in (0..size).rev() {
            let from = Pos::new(row, col);
            let Some(tile) = grid.tile(from) else {
                continue;
            };
            cursor -= 1;
            if row != cursor {
                let to = Pos::new(cursor, col);
                grid.set(to, Some(tile));
                grid.set(from, None);
                moves.push(FallMove { from, to, tile });
            }
        }
    }

    moves
}
