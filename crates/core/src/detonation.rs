//! Detonation processor
//!
//! Works on a [`Marks`] set: the cells that will be eliminated this round, the
//! promotion cells that must survive it, and the specials that already fired.
//! A swept cell carrying an unfired special is queued and expanded in turn
//! (breadth first) until the set stops growing.
//!
//! Wildcard tiles are never swept. A rainbow only leaves the grid as the origin
//! of its own detonation, which the caller requests with [`Marks::force`].

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::sequence::{Effect, PlacedTile};
use crate::types::{EffectKind, Pos, Special, DIAMOND_RANGE, SUPER_DIAMOND_RANGE};

/// Per-round elimination bookkeeping
#[derive(Debug, Clone)]
pub struct Marks {
    size: usize,
    matched: Vec<bool>,
    reserved: Vec<bool>,
    fired: Vec<bool>,
    effects: Vec<Effect>,
}

impl Marks {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            matched: vec![false; size * size],
            reserved: vec![false; size * size],
            fired: vec![false; size * size],
            effects: Vec::new(),
        }
    }

    fn slot(&self, pos: Pos) -> Option<usize> {
        (pos.row < self.size && pos.col < self.size).then(|| pos.index(self.size))
    }

    /// Exempt `pos` from elimination this round
    pub fn reserve(&mut self, pos: Pos) {
        if let Some(i) = self.slot(pos) {
            self.reserved[i] = true;
            self.matched[i] = false;
        }
    }

    pub fn is_reserved(&self, pos: Pos) -> bool {
        self.slot(pos).map_or(false, |i| self.reserved[i])
    }

    pub fn is_matched(&self, pos: Pos) -> bool {
        self.slot(pos).map_or(false, |i| self.matched[i])
    }

    pub fn is_fired(&self, pos: Pos) -> bool {
        self.slot(pos).map_or(false, |i| self.fired[i])
    }

    /// Mark `pos` for elimination unless it is reserved, empty or a wildcard
    pub fn mark(&mut self, grid: &Grid, pos: Pos) -> bool {
        let Some(i) = self.slot(pos) else {
            return false;
        };
        if self.reserved[i] {
            return false;
        }
        match grid.tile(pos) {
            Some(tile) if !tile.is_wildcard() => {
                self.matched[i] = true;
                true
            }
            _ => false,
        }
    }

    /// Mark a rainbow origin, which wildcard immunity would otherwise skip
    pub fn force(&mut self, pos: Pos) {
        if let Some(i) = self.slot(pos) {
            self.matched[i] = true;
        }
    }

    fn fire(&mut self, pos: Pos) {
        if let Some(i) = self.slot(pos) {
            self.fired[i] = true;
        }
    }

    pub fn push_effect(&mut self, kind: EffectKind, origin: Pos) {
        self.effects.push(Effect { kind, origin });
    }

    /// Marked cells in row-major order
    pub fn matched(&self) -> Vec<Pos> {
        self.matched
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| Pos::from_index(i, self.size))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.matched.iter().any(|&m| m)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

/// Whole row (horizontal) or column through `origin`
pub fn line_cells(grid: &Grid, origin: Pos, horizontal: bool) -> Vec<Pos> {
    (0..grid.size())
        .map(|i| {
            if horizontal {
                Pos::new(origin.row, i)
            } else {
                Pos::new(i, origin.col)
            }
        })
        .collect()
}

/// Cells within Manhattan distance `range` of `center`, row-major
pub fn diamond_cells(grid: &Grid, center: Pos, range: u8) -> Vec<Pos> {
    let range = usize::from(range);
    let last = grid.size().saturating_sub(1);
    let rows = center.row.saturating_sub(range)..=(center.row + range).min(last);

    let mut cells = Vec::new();
    for row in rows {
        for col in center.col.saturating_sub(range)..=(center.col + range).min(last) {
            let p = Pos::new(row, col);
            if p.manhattan(center) <= range {
                cells.push(p);
            }
        }
    }
    cells
}

/// Three rows and three columns centered on `center` (clamped), row-major
pub fn band_cells(grid: &Grid, center: Pos) -> Vec<Pos> {
    let near = |a: usize, b: usize| a.abs_diff(b) <= 1;
    grid.positions()
        .filter(|p| near(p.row, center.row) || near(p.col, center.col))
        .collect()
}

/// Color a rainbow targets without a swap partner: first adjacent gem (up, right, down, left)
pub fn rainbow_target(grid: &Grid, origin: Pos) -> Option<u8> {
    grid.neighbors(origin)
        .into_iter()
        .find_map(|p| grid.match_color(p))
}

/// Effect and swept cells of a single special at `origin`
///
/// `partner` is the color a rainbow was swapped with; without one the rainbow
/// takes the color of its first gem neighbour.
pub fn blast(
    grid: &Grid,
    origin: Pos,
    special: Special,
    partner: Option<u8>,
) -> Option<(EffectKind, Vec<Pos>)> {
    let out = match special {
        Special::None => return None,
        Special::LineH => (EffectKind::LineH, line_cells(grid, origin, true)),
        Special::LineV => (EffectKind::LineV, line_cells(grid, origin, false)),
        Special::Diamond => (
            EffectKind::Diamond {
                range: DIAMOND_RANGE,
            },
            diamond_cells(grid, origin, DIAMOND_RANGE),
        ),
        Special::Rainbow => {
            let cells = partner
                .or_else(|| rainbow_target(grid, origin))
                .map(|color| grid.positions_of(color))
                .unwrap_or_default();
            (EffectKind::RainbowFlash, cells)
        }
    };
    Some(out)
}

/// Fire the special at `origin` and sweep its cells, queueing specials it reaches
fn fire_at(
    grid: &Grid,
    marks: &mut Marks,
    origin: Pos,
    partner: Option<u8>,
    queue: &mut VecDeque<Pos>,
) {
    let Some(tile) = grid.tile(origin) else {
        return;
    };
    let Some((kind, cells)) = blast(grid, origin, tile.special, partner) else {
        return;
    };

    marks.fire(origin);
    marks.push_effect(kind, origin);
    if tile.special == Special::Rainbow {
        marks.force(origin);
    }

    for p in cells {
        if marks.mark(grid, p) && !marks.is_fired(p) && is_special_at(grid, p) {
            queue.push_back(p);
        }
    }
}

fn is_special_at(grid: &Grid, pos: Pos) -> bool {
    grid.tile(pos).map_or(false, |t| t.special.is_special())
}

fn drain(grid: &Grid, marks: &mut Marks, queue: &mut VecDeque<Pos>) {
    while let Some(pos) = queue.pop_front() {
        if marks.is_fired(pos) {
            continue;
        }
        fire_at(grid, marks, pos, None, queue);
    }
}

/// Breadth-first closure over every marked, unfired special
pub fn expand(grid: &Grid, marks: &mut Marks) {
    let mut queue: VecDeque<Pos> = marks
        .matched()
        .into_iter()
        .filter(|&p| !marks.is_fired(p) && is_special_at(grid, p))
        .collect();
    drain(grid, marks, &mut queue);
}

/// Detonate a rainbow at `origin` against `color`, then close over the chain
///
/// Specials the flash sweeps fire first, in sweep order; anything marked
/// before the call is picked up afterwards.
pub fn detonate_rainbow(grid: &Grid, marks: &mut Marks, origin: Pos, color: u8) {
    let mut queue = VecDeque::new();
    fire_at(grid, marks, origin, Some(color), &mut queue);
    drain(grid, marks, &mut queue);
    expand(grid, marks);
}

/// Combined detonation of two swapped specials at `a` and `b`
///
/// Returns the tiles a rainbow pair turned into specials; those are already
/// written to the grid and swept.
pub fn pair_blast(grid: &mut Grid, marks: &mut Marks, a: Pos, b: Pos) -> Vec<PlacedTile> {
    let (Some(ta), Some(tb)) = (grid.tile(a), grid.tile(b)) else {
        return Vec::new();
    };
    let center = a.min(b);

    match (ta.special, tb.special) {
        (Special::Rainbow, Special::Rainbow) => {
            for p in grid.positions().collect::<Vec<_>>() {
                marks.mark(grid, p);
            }
            for origin in [a, b] {
                marks.force(origin);
                marks.fire(origin);
                marks.push_effect(EffectKind::RainbowFlash, origin);
            }
            expand(grid, marks);
            Vec::new()
        }
        (Special::Rainbow, _) => rainbow_transform(grid, marks, a, b),
        (_, Special::Rainbow) => rainbow_transform(grid, marks, b, a),
        (sa, sb) => {
            let cells = if sa.is_line() && sb.is_line() {
                marks.push_effect(EffectKind::LineH, center);
                marks.push_effect(EffectKind::LineV, center);
                let mut cells = line_cells(grid, center, true);
                cells.extend(line_cells(grid, center, false));
                cells
            } else if sa == Special::Diamond && sb == Special::Diamond {
                marks.push_effect(
                    EffectKind::Diamond {
                        range: SUPER_DIAMOND_RANGE,
                    },
                    center,
                );
                diamond_cells(grid, center, SUPER_DIAMOND_RANGE)
            } else {
                // Line with diamond: three rows and three columns.
                let last = grid.size().saturating_sub(1);
                for row in center.row.saturating_sub(1)..=(center.row + 1).min(last) {
                    marks.push_effect(EffectKind::LineH, Pos::new(row, center.col));
                }
                for col in center.col.saturating_sub(1)..=(center.col + 1).min(last) {
                    marks.push_effect(EffectKind::LineV, Pos::new(center.row, col));
                }
                band_cells(grid, center)
            };

            for origin in [a, b] {
                marks.fire(origin);
                marks.mark(grid, origin);
            }
            for p in cells {
                marks.mark(grid, p);
            }
            expand(grid, marks);
            Vec::new()
        }
    }
}

/// Rainbow at `rainbow` swapped with special at `other`: every plain tile of the
/// other's color takes its special, then all of them detonate
fn rainbow_transform(
    grid: &mut Grid,
    marks: &mut Marks,
    rainbow: Pos,
    other: Pos,
) -> Vec<PlacedTile> {
    let Some(partner) = grid.tile(other) else {
        return Vec::new();
    };
    let Some(color) = partner.match_color() else {
        return Vec::new();
    };

    let mut transforms = Vec::new();
    for p in grid.positions_of(color) {
        let Some(tile) = grid.tile(p) else {
            continue;
        };
        if tile.special == Special::None && !marks.is_reserved(p) {
            let placed = tile.with_special(partner.special);
            grid.set(p, Some(placed));
            transforms.push(PlacedTile { pos: p, tile: placed });
        }
    }

    marks.force(rainbow);
    marks.fire(rainbow);
    marks.push_effect(EffectKind::RainbowFlash, rainbow);
    for p in grid.positions_of(color) {
        marks.mark(grid, p);
    }
    expand(grid, marks);

    transforms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    fn grid(rows: &[&str]) -> Grid {
        Grid::parse(rows).unwrap()
    }

    fn base() -> Grid {
        grid(&[
            "ABCDEF", //
            "BCDEFA", //
            "CDEFAB", //
            "DEFABC", //
            "EFABCD", //
            "FABCDE",
        ])
    }

    #[test]
    fn diamond_has_thirteen_cells_in_the_open() {
        let g = Grid::new(8);
        assert_eq!(diamond_cells(&g, Pos::new(4, 4), DIAMOND_RANGE).len(), 13);
        assert_eq!(
            diamond_cells(&g, Pos::new(4, 4), SUPER_DIAMOND_RANGE).len(),
            25
        );
        // Corner clamps to the grid.
        assert_eq!(diamond_cells(&g, Pos::new(0, 0), DIAMOND_RANGE).len(), 6);
    }

    #[test]
    fn band_covers_three_rows_and_columns() {
        let g = Grid::new(8);
        // 3 rows of 8 plus 3 columns of 8, minus the 9 shared cells.
        assert_eq!(band_cells(&g, Pos::new(3, 3)).len(), 39);
        assert_eq!(band_cells(&g, Pos::new(0, 0)).len(), 28);
    }

    #[test]
    fn rainbow_targets_first_gem_neighbour() {
        let mut g = base();
        g.set(Pos::new(2, 2), Some(Tile::rainbow()));
        // Up neighbour (1,2) is 'D'.
        assert_eq!(rainbow_target(&g, Pos::new(2, 2)), Some(3));
        g.set(Pos::new(1, 2), None);
        // Then right (2,3) 'F'.
        assert_eq!(rainbow_target(&g, Pos::new(2, 2)), Some(5));
    }

    #[test]
    fn chain_reaches_swept_specials() {
        let mut g = base();
        g.set(Pos::new(0, 0), Some(Tile::gem(0).with_special(Special::LineV)));
        g.set(Pos::new(5, 0), Some(Tile::gem(5).with_special(Special::LineH)));

        let mut marks = Marks::new(g.size());
        marks.mark(&g, Pos::new(0, 0));
        expand(&g, &mut marks);

        let matched = marks.matched();
        // Column 0 plus row 5, sharing (5,0).
        assert_eq!(matched.len(), 11);
        assert!(marks.is_fired(Pos::new(5, 0)));
        let kinds: Vec<EffectKind> = marks.effects().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EffectKind::LineV, EffectKind::LineH]);
    }

    #[test]
    fn reserved_and_wildcard_cells_survive() {
        let mut g = base();
        g.set(Pos::new(2, 0), Some(Tile::gem(2).with_special(Special::LineH)));
        g.set(Pos::new(2, 4), Some(Tile::rainbow()));

        let mut marks = Marks::new(g.size());
        marks.reserve(Pos::new(2, 1));
        marks.mark(&g, Pos::new(2, 0));
        expand(&g, &mut marks);

        assert!(!marks.is_matched(Pos::new(2, 1)));
        assert!(!marks.is_matched(Pos::new(2, 4)));
        assert_eq!(marks.matched().len(), 4);
    }

    #[test]
    fn line_pair_clears_row_and_column_at_center() {
        let mut g = base();
        g.set(Pos::new(3, 3), Some(Tile::gem(0).with_special(Special::LineH)));
        g.set(Pos::new(3, 4), Some(Tile::gem(1).with_special(Special::LineV)));

        let mut marks = Marks::new(g.size());
        let transforms = pair_blast(&mut g, &mut marks, Pos::new(3, 4), Pos::new(3, 3));
        assert!(transforms.is_empty());

        let matched = marks.matched();
        assert_eq!(matched.len(), 11);
        assert!(matched.iter().all(|p| p.row == 3 || p.col == 3));
    }

    #[test]
    fn diamond_pair_is_a_super_diamond_at_center() {
        let mut g = base();
        g.set(Pos::new(2, 2), Some(Tile::gem(4).with_special(Special::Diamond)));
        g.set(Pos::new(2, 3), Some(Tile::gem(5).with_special(Special::Diamond)));

        let mut marks = Marks::new(g.size());
        let transforms = pair_blast(&mut g, &mut marks, Pos::new(2, 3), Pos::new(2, 2));
        assert!(transforms.is_empty());

        assert_eq!(
            marks.effects(),
            &[Effect {
                kind: EffectKind::Diamond {
                    range: SUPER_DIAMOND_RANGE
                },
                origin: Pos::new(2, 2),
            }]
        );
        let matched = marks.matched();
        // 6 + 2*5 + 2*3 + 1; row -1 is off the grid.
        assert_eq!(matched.len(), 23);
        assert_eq!(matched, diamond_cells(&g, Pos::new(2, 2), SUPER_DIAMOND_RANGE));
        assert!(matched.iter().all(|p| p.manhattan(Pos::new(2, 2)) <= 3));
    }

    #[test]
    fn line_with_diamond_clears_three_rows_and_columns() {
        let mut g = base();
        g.set(Pos::new(2, 2), Some(Tile::gem(4).with_special(Special::LineH)));
        g.set(Pos::new(2, 3), Some(Tile::gem(5).with_special(Special::Diamond)));

        let mut marks = Marks::new(g.size());
        pair_blast(&mut g, &mut marks, Pos::new(2, 2), Pos::new(2, 3));

        let expected: Vec<Pos> = g
            .positions()
            .filter(|p| (1..=3).contains(&p.row) || (1..=3).contains(&p.col))
            .collect();
        assert_eq!(expected.len(), 27);
        assert_eq!(marks.matched(), expected);

        let effects: Vec<(EffectKind, Pos)> =
            marks.effects().iter().map(|e| (e.kind, e.origin)).collect();
        assert_eq!(
            effects,
            vec![
                (EffectKind::LineH, Pos::new(1, 2)),
                (EffectKind::LineH, Pos::new(2, 2)),
                (EffectKind::LineH, Pos::new(3, 2)),
                (EffectKind::LineV, Pos::new(2, 1)),
                (EffectKind::LineV, Pos::new(2, 2)),
                (EffectKind::LineV, Pos::new(2, 3)),
            ]
        );
        assert!(marks.is_fired(Pos::new(2, 2)));
        assert!(marks.is_fired(Pos::new(2, 3)));
    }

    #[test]
    fn rainbow_flash_fires_swept_specials() {
        let mut g = base();
        g.set(Pos::new(0, 0), Some(Tile::rainbow()));
        // One of the 'D' cells carries a row clearer.
        g.set(Pos::new(4, 5), Some(Tile::gem(3).with_special(Special::LineH)));

        let mut marks = Marks::new(g.size());
        detonate_rainbow(&g, &mut marks, Pos::new(0, 0), 3);

        assert!(marks.is_matched(Pos::new(0, 0)));
        assert!(marks.is_fired(Pos::new(4, 5)));
        assert!((0..6).all(|c| marks.is_matched(Pos::new(4, c))));
        // Origin, six 'D' cells, five more in row 4.
        assert_eq!(marks.matched().len(), 12);

        let effects: Vec<(EffectKind, Pos)> =
            marks.effects().iter().map(|e| (e.kind, e.origin)).collect();
        assert_eq!(
            effects,
            vec![
                (EffectKind::RainbowFlash, Pos::new(0, 0)),
                (EffectKind::LineH, Pos::new(4, 5)),
            ]
        );
    }

    #[test]
    fn rainbow_pair_transforms_partner_color() {
        let mut g = base();
        g.set(Pos::new(0, 0), Some(Tile::rainbow()));
        g.set(Pos::new(0, 1), Some(Tile::gem(1).with_special(Special::Diamond)));

        let mut marks = Marks::new(g.size());
        let transforms = pair_blast(&mut g, &mut marks, Pos::new(0, 0), Pos::new(0, 1));

        // Every other 'B' became a diamond.
        assert_eq!(transforms.len(), g.positions_of(1).len() - 1);
        assert!(transforms
            .iter()
            .all(|t| t.tile.special == Special::Diamond));
        assert!(marks.is_matched(Pos::new(0, 0)));
        assert!(marks
            .effects()
            .iter()
            .any(|e| e.kind == EffectKind::RainbowFlash && e.origin == Pos::new(0, 0)));
    }

    #[test]
    fn double_rainbow_clears_everything_but_other_wildcards() {
        let mut g = base();
        g.set(Pos::new(1, 1), Some(Tile::rainbow()));
        g.set(Pos::new(1, 2), Some(Tile::rainbow()));
        g.set(Pos::new(5, 5), Some(Tile::rainbow()));

        let mut marks = Marks::new(g.size());
        pair_blast(&mut g, &mut marks, Pos::new(1, 1), Pos::new(1, 2));
        assert_eq!(marks.matched().len(), 35);
        assert!(!marks.is_matched(Pos::new(5, 5)));
    }
}
