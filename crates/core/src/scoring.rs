//! Scoring module - points per match
//!
//! `score = (base + special_bonus + shape_bonus) * combo`, where `combo` is the
//! cascade multiplier `max(1, depth)` of the round the match resolved in.

use crate::matcher::Match;
use crate::types::{Shape, Special, LONG_RUN_BASE, LONG_RUN_STEP, RUN_SCORES, SHAPE_BONUS};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub base: u32,
    pub special_bonus: u32,
    pub shape_bonus: u32,
    /// Cascade multiplier applied to the sum above.
    pub multiplier: u32,
    pub total: u32,
}

/// Base points for a match of `count` tiles
pub fn base_score(count: usize) -> u32 {
    match count {
        0..=2 => 0,
        3..=5 => RUN_SCORES[count - 3],
        _ => LONG_RUN_BASE + LONG_RUN_STEP * (count as u32 - 6),
    }
}

/// Bonus for the special a match promotes into
pub fn special_bonus(promotion: Special) -> u32 {
    match promotion {
        Special::None => 0,
        Special::LineH | Special::LineV => 50,
        Special::Diamond => 100,
        Special::Rainbow => 150,
    }
}

pub fn shape_bonus(shape: Shape) -> u32 {
    match shape {
        Shape::LShape | Shape::TShape => SHAPE_BONUS,
        Shape::HLine | Shape::VLine => 0,
    }
}

/// Multiplier for a round resolved at cascade depth `combo`
pub fn combo_multiplier(combo: u32) -> u32 {
    combo.max(1)
}

/// Calculate the complete score for one match
pub fn score_match(m: &Match, combo: u32) -> ScoreResult {
    let base = base_score(m.count());
    let special_bonus = special_bonus(m.promotion);
    let shape_bonus = shape_bonus(m.shape);
    let multiplier = combo_multiplier(combo);
    let total = (base + special_bonus + shape_bonus).saturating_mul(multiplier);

    ScoreResult {
        base,
        special_bonus,
        shape_bonus,
        multiplier,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    fn line(count: usize, promotion: Special) -> Match {
        Match {
            cells: (0..count).map(|c| Pos::new(0, c)).collect(),
            color: 0,
            shape: Shape::HLine,
            pivot: Pos::new(0, 0),
            promotion,
        }
    }

    #[test]
    fn test_base_scores() {
        assert_eq!(base_score(3), 30);
        assert_eq!(base_score(4), 80);
        assert_eq!(base_score(5), 200);
        assert_eq!(base_score(6), 300);
        assert_eq!(base_score(8), 400);
        assert_eq!(base_score(2), 0);
    }

    #[test]
    fn test_bonuses() {
        assert_eq!(special_bonus(Special::None), 0);
        assert_eq!(special_bonus(Special::LineV), 50);
        assert_eq!(special_bonus(Special::Diamond), 100);
        assert_eq!(special_bonus(Special::Rainbow), 150);
        assert_eq!(shape_bonus(Shape::LShape), 100);
        assert_eq!(shape_bonus(Shape::VLine), 0);
    }

    #[test]
    fn test_match_scores() {
        assert_eq!(score_match(&line(3, Special::None), 0).total, 30);
        assert_eq!(score_match(&line(4, Special::LineH), 0).total, 130);
        assert_eq!(score_match(&line(5, Special::Rainbow), 1).total, 350);

        let l = Match {
            shape: Shape::LShape,
            ..line(5, Special::Diamond)
        };
        let result = score_match(&l, 0);
        assert_eq!(result.base, 200);
        assert_eq!(result.special_bonus, 100);
        assert_eq!(result.shape_bonus, 100);
        assert_eq!(result.total, 400);
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(combo_multiplier(0), 1);
        assert_eq!(combo_multiplier(1), 1);
        assert_eq!(combo_multiplier(3), 3);
        assert_eq!(score_match(&line(3, Special::None), 3).total, 90);
    }
}
