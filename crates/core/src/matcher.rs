//! Match detection
//!
//! Finds maximal same-color runs of at least [`MIN_RUN`] tiles along rows and
//! columns, merges a row run and a column run that share a cell into one L or T
//! shaped match, and predicts whether a candidate swap would produce a match
//! without touching the grid.
//!
//! Wildcard tiles have no match color and therefore never extend a run.

use crate::classifier::{classify, median_index};
use crate::grid::Grid;
use crate::types::{Color, Pos, Shape, Special, MIN_RUN};

/// One detected match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Member cells in row-major order
    pub cells: Vec<Pos>,
    pub color: u8,
    pub shape: Shape,
    /// Cell that survives as the promoted special (crossing cell for L/T)
    pub pivot: Pos,
    pub promotion: Special,
}

impl Match {
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    fn line(run: &Run) -> Self {
        let shape = if run.horizontal {
            Shape::HLine
        } else {
            Shape::VLine
        };
        let mut cells = run.cells.clone();
        cells.sort_unstable();
        Self {
            pivot: run.cells[median_index(run.cells.len())],
            promotion: classify(shape, run.cells.len()),
            cells,
            color: run.color,
            shape,
        }
    }

    fn crossing(runs: &[&Run], pivot: Pos, shape: Shape) -> Self {
        let mut cells: Vec<Pos> = runs.iter().flat_map(|r| r.cells.iter().copied()).collect();
        cells.sort_unstable();
        cells.dedup();
        Self {
            promotion: classify(shape, cells.len()),
            color: runs[0].color,
            cells,
            shape,
            pivot,
        }
    }
}

/// A maximal straight run, cells ordered along the line
#[derive(Debug, Clone)]
struct Run {
    cells: Vec<Pos>,
    color: u8,
    horizontal: bool,
}

impl Run {
    fn is_end(&self, pos: Pos) -> bool {
        self.cells.first() == Some(&pos) || self.cells.last() == Some(&pos)
    }
}

fn scan_runs(grid: &Grid) -> Vec<Run> {
    let size = grid.size();
    let mut runs = Vec::new();

    for horizontal in [true, false] {
        for line in 0..size {
            let at = |i: usize| {
                if horizontal {
                    Pos::new(line, i)
                } else {
                    Pos::new(i, line)
                }
            };
            let mut start = 0;
            while start < size {
                let Some(color) = grid.match_color(at(start)) else {
                    start += 1;
                    continue;
                };
                let mut end = start + 1;
                while end < size && grid.match_color(at(end)) == Some(color) {
                    end += 1;
                }
                if end - start >= MIN_RUN {
                    runs.push(Run {
                        cells: (start..end).map(at).collect(),
                        color,
                        horizontal,
                    });
                }
                start = end;
            }
        }
    }

    runs
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Shape of two crossing runs meeting at `pivot`
fn crossing_shape(a: &Run, b: &Run, pivot: Pos) -> Shape {
    if a.is_end(pivot) && b.is_end(pivot) {
        Shape::LShape
    } else {
        Shape::TShape
    }
}

/// Find every match currently on the grid
///
/// Matches are ordered by their first run in scan order (rows top to bottom,
/// then columns left to right).
pub fn detect_all(grid: &Grid) -> Vec<Match> {
    let runs = scan_runs(grid);
    if runs.is_empty() {
        return Vec::new();
    }

    let size = grid.size();
    let mut row_run_at: Vec<Option<usize>> = vec![None; size * size];
    for (i, run) in runs.iter().enumerate().filter(|(_, r)| r.horizontal) {
        for &p in &run.cells {
            row_run_at[p.index(size)] = Some(i);
        }
    }

    let mut parent: Vec<usize> = (0..runs.len()).collect();
    // First crossing seen per pair: (row run, column run, shared cell).
    let mut crossings: Vec<(usize, usize, Pos)> = Vec::new();
    for (i, run) in runs.iter().enumerate().filter(|(_, r)| !r.horizontal) {
        for &p in &run.cells {
            if let Some(h) = row_run_at[p.index(size)] {
                crossings.push((h, i, p));
                let (rh, rv) = (find(&mut parent, h), find(&mut parent, i));
                if rh != rv {
                    parent[rv] = rh;
                }
            }
        }
    }

    let mut seen_roots: Vec<usize> = Vec::new();
    let mut matches = Vec::new();
    for i in 0..runs.len() {
        let root = find(&mut parent, i);
        if seen_roots.contains(&root) {
            continue;
        }
        seen_roots.push(root);

        let members: Vec<&Run> = (0..runs.len())
            .filter(|&j| find(&mut parent, j) == root)
            .map(|j| &runs[j])
            .collect();

        if members.len() == 1 {
            matches.push(Match::line(members[0]));
            continue;
        }

        let first_crossing = crossings
            .iter()
            .copied()
            .filter(|&(h, _, _)| find(&mut parent, h) == root)
            .min_by_key(|&(h, v, _)| (h, v));
        if let Some((h, v, pivot)) = first_crossing {
            let shape = crossing_shape(&runs[h], &runs[v], pivot);
            matches.push(Match::crossing(&members, pivot, shape));
        }
    }

    matches
}

/// Cells of the straight run through `pos` if it held `color`, ordered along the line.
/// `lookup` answers the match color of every other cell.
fn run_through<F>(size: usize, pos: Pos, color: u8, horizontal: bool, lookup: &F) -> Vec<Pos>
where
    F: Fn(Pos) -> Option<u8>,
{
    let step = |p: Pos, forward: bool| -> Option<Pos> {
        let (line, i) = if horizontal {
            (p.row, p.col)
        } else {
            (p.col, p.row)
        };
        let next = if forward {
            (i + 1 < size).then_some(i + 1)?
        } else {
            i.checked_sub(1)?
        };
        Some(if horizontal {
            Pos::new(line, next)
        } else {
            Pos::new(next, line)
        })
    };

    let mut start = pos;
    while let Some(prev) = step(start, false) {
        if lookup(prev) != Some(color) {
            break;
        }
        start = prev;
    }

    let mut cells = vec![start];
    let mut cur = start;
    while let Some(next) = step(cur, true) {
        if next != pos && lookup(next) != Some(color) {
            break;
        }
        cells.push(next);
        cur = next;
    }
    cells
}

fn matches_through<F>(size: usize, pos: Pos, color: Color, lookup: &F) -> Vec<Match>
where
    F: Fn(Pos) -> Option<u8>,
{
    let Some(color) = color.gem() else {
        return Vec::new();
    };

    let h = Run {
        cells: run_through(size, pos, color, true, lookup),
        color,
        horizontal: true,
    };
    let v = Run {
        cells: run_through(size, pos, color, false, lookup),
        color,
        horizontal: false,
    };

    match (h.cells.len() >= MIN_RUN, v.cells.len() >= MIN_RUN) {
        (true, true) => {
            let shape = crossing_shape(&h, &v, pos);
            vec![Match::crossing(&[&h, &v], pos, shape)]
        }
        (true, false) => vec![Match::line(&h)],
        (false, true) => vec![Match::line(&v)],
        (false, false) => Vec::new(),
    }
}

/// Matches that would pass through `pos` if it held `as_color`
///
/// The grid is not modified; every other cell keeps its current color.
pub fn detect_at(grid: &Grid, pos: Pos, as_color: Color) -> Vec<Match> {
    if !grid.contains(pos) {
        return Vec::new();
    }
    matches_through(grid.size(), pos, as_color, &|p| grid.match_color(p))
}

/// True if placing `color` at `pos` would complete a run with already-filled cells
pub fn completes_run(grid: &Grid, pos: Pos, color: u8) -> bool {
    !detect_at(grid, pos, Color::Gem(color)).is_empty()
}

/// Would exchanging `a` and `b` line up a run at either endpoint?
pub fn swap_would_match(grid: &Grid, a: Pos, b: Pos) -> bool {
    let (Some(ta), Some(tb)) = (grid.tile(a), grid.tile(b)) else {
        return false;
    };
    let lookup = |p: Pos| {
        if p == a {
            tb.match_color()
        } else if p == b {
            ta.match_color()
        } else {
            grid.match_color(p)
        }
    };
    let size = grid.size();
    !matches_through(size, a, tb.color, &lookup).is_empty()
        || !matches_through(size, b, ta.color, &lookup).is_empty()
}

/// Would a player swap of `a` and `b` be accepted?
///
/// Rainbow involvement and special pairs always resolve; ordinary swaps need a match.
pub fn is_productive_swap(grid: &Grid, a: Pos, b: Pos) -> bool {
    let (Some(ta), Some(tb)) = (grid.tile(a), grid.tile(b)) else {
        return false;
    };
    if !a.is_adjacent(b) {
        return false;
    }
    if ta.special == Special::Rainbow || tb.special == Special::Rainbow {
        return true;
    }
    if ta.special.is_special() && tb.special.is_special() {
        return true;
    }
    swap_would_match(grid, a, b)
}

/// First productive swap in scan order, right neighbour before down neighbour
pub fn find_legal_move(grid: &Grid) -> Option<(Pos, Pos)> {
    let size = grid.size();
    for p in grid.positions() {
        if p.col + 1 < size {
            let right = Pos::new(p.row, p.col + 1);
            if is_productive_swap(grid, p, right) {
                return Some((p, right));
            }
        }
        if p.row + 1 < size {
            let down = Pos::new(p.row + 1, p.col);
            if is_productive_swap(grid, p, down) {
                return Some((p, down));
            }
        }
    }
    None
}

pub fn has_any_legal_move(grid: &Grid) -> bool {
    find_legal_move(grid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    fn grid(rows: &[&str]) -> Grid {
        Grid::parse(rows).unwrap()
    }

    #[test]
    fn detects_nothing_on_quiet_grid() {
        let g = grid(&["ABAB", "BABA", "ABAB", "BABA"]);
        assert!(detect_all(&g).is_empty());
    }

    #[test]
    fn detects_horizontal_run_with_median_pivot() {
        let g = grid(&["AAAA", "BCDB", "CDBC", "DBCD"]);
        let m = detect_all(&g);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].shape, Shape::HLine);
        assert_eq!(m[0].count(), 4);
        assert_eq!(m[0].pivot, Pos::new(0, 1));
        assert_eq!(m[0].promotion, Special::LineH);
    }

    #[test]
    fn detects_vertical_run() {
        let g = grid(&["ABCD", "ACDB", "ADBC", "BCDA"]);
        let m = detect_all(&g);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].shape, Shape::VLine);
        assert_eq!(m[0].color, 0);
        assert_eq!(m[0].cells, vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]);
        assert_eq!(m[0].promotion, Special::None);
    }

    #[test]
    fn merges_l_shape_at_corner() {
        let g = grid(&[
            "DEFDE", //
            "DCCCF", //
            "ECDEF", //
            "FCEFD", //
            "DEFDE",
        ]);
        let m = detect_all(&g);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].shape, Shape::LShape);
        assert_eq!(m[0].pivot, Pos::new(1, 1));
        assert_eq!(m[0].count(), 5);
        assert_eq!(m[0].promotion, Special::Diamond);
    }

    #[test]
    fn merges_t_shape_when_pivot_is_interior() {
        let g = grid(&[
            "ABABA", //
            "CCCBA", //
            "BCADD", //
            "ACBAB", //
            "BABAB",
        ]);
        let m = detect_all(&g);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].shape, Shape::TShape);
        assert_eq!(m[0].pivot, Pos::new(1, 1));
        assert_eq!(m[0].count(), 5);
    }

    #[test]
    fn wildcard_breaks_runs() {
        let g = grid(&["AA*A", "BCDB", "CDBC", "DBCD"]);
        assert!(detect_all(&g).is_empty());
    }

    #[test]
    fn five_run_stays_a_line() {
        let g = grid(&[
            "AAAAA", //
            "BCDBC", //
            "CDBCD", //
            "DBCDB", //
            "BCDBC",
        ]);
        let m = detect_all(&g);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].shape, Shape::HLine);
        assert_eq!(m[0].pivot, Pos::new(0, 2));
        assert_eq!(m[0].promotion, Special::Rainbow);
    }

    #[test]
    fn separate_runs_stay_separate() {
        let g = grid(&["AAAB", "CDCD", "DCDC", "BBBA"]);
        let m = detect_all(&g);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].color, 0);
        assert_eq!(m[1].color, 1);
    }

    #[test]
    fn detect_at_predicts_without_mutation() {
        let g = grid(&["AABA", "CDCD", "DCDC", "CDCD"]);
        let before = g.clone();
        let m = detect_at(&g, Pos::new(0, 2), Color::Gem(0));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].count(), 4);
        assert!(detect_at(&g, Pos::new(0, 2), Color::Wildcard).is_empty());
        assert_eq!(g, before);
    }

    #[test]
    fn swap_prediction_accounts_for_both_endpoints() {
        let g = grid(&["AABA", "CDCD", "DCDC", "CDCD"]);
        // After the swap (0,3) holds B, so the run is exactly three long.
        assert!(swap_would_match(&g, Pos::new(0, 2), Pos::new(0, 3)));
        assert!(!swap_would_match(&g, Pos::new(1, 0), Pos::new(1, 1)));
    }

    #[test]
    fn special_pairs_and_rainbows_are_always_legal() {
        let deadlocked = ["ABCA", "BCAB", "CABC", "ABCA"];
        let mut g = grid(&deadlocked);
        assert!(!has_any_legal_move(&g));

        g.set(Pos::new(0, 0), Some(Tile::rainbow()));
        assert!(has_any_legal_move(&g));

        let mut g = grid(&deadlocked);
        g.set(Pos::new(2, 2), Some(Tile::gem(1).with_special(Special::LineH)));
        assert!(!has_any_legal_move(&g));
        g.set(Pos::new(2, 3), Some(Tile::gem(2).with_special(Special::Diamond)));
        assert_eq!(find_legal_move(&g), Some((Pos::new(2, 2), Pos::new(2, 3))));
    }

    #[test]
    fn completes_run_checks_both_sides() {
        let g = grid(&["A.AB", "CDCD", "DCDC", "CDCD"]);
        assert!(completes_run(&g, Pos::new(0, 1), 0));
        assert!(!completes_run(&g, Pos::new(0, 1), 1));
    }
}
