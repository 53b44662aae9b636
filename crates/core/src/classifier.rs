//! Special-tile classification and promotion upgrades

use crate::types::{Shape, Special};

/// Special a match of `shape` and `count` tiles promotes into
///
/// | shape | count | promotion |
/// |-------|-------|-----------|
/// | HLine | 4 | LineH |
/// | VLine | 4 | LineV |
/// | line | 5+ | Rainbow |
/// | L / T | any | Diamond |
/// | any | 3 | None |
pub fn classify(shape: Shape, count: usize) -> Special {
    match (shape, count) {
        (Shape::LShape | Shape::TShape, _) => Special::Diamond,
        (_, 0..=3) => Special::None,
        (Shape::HLine, 4) => Special::LineH,
        (Shape::VLine, 4) => Special::LineV,
        _ => Special::Rainbow,
    }
}

/// Index of the promotion cell in a line of `len` cells (lower median for even lengths)
pub fn median_index(len: usize) -> usize {
    len.saturating_sub(1) / 2
}

/// Resolve a promotion landing on a cell that already carries `existing`
///
/// Higher priority wins; two lines make a diamond and two diamonds make a rainbow.
pub fn upgrade(existing: Special, incoming: Special) -> Special {
    match (existing, incoming) {
        (Special::None, s) | (s, Special::None) => s,
        (a, b) if a.is_line() && b.is_line() => Special::Diamond,
        (Special::Diamond, Special::Diamond) => Special::Rainbow,
        (a, b) if a.priority() >= b.priority() => a,
        (_, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        assert_eq!(classify(Shape::HLine, 3), Special::None);
        assert_eq!(classify(Shape::VLine, 3), Special::None);
        assert_eq!(classify(Shape::HLine, 4), Special::LineH);
        assert_eq!(classify(Shape::VLine, 4), Special::LineV);
        assert_eq!(classify(Shape::HLine, 5), Special::Rainbow);
        assert_eq!(classify(Shape::VLine, 7), Special::Rainbow);
        assert_eq!(classify(Shape::LShape, 5), Special::Diamond);
        assert_eq!(classify(Shape::TShape, 7), Special::Diamond);
    }

    #[test]
    fn test_median_prefers_lower_index() {
        assert_eq!(median_index(3), 1);
        assert_eq!(median_index(4), 1);
        assert_eq!(median_index(5), 2);
        assert_eq!(median_index(6), 2);
    }

    #[test]
    fn test_upgrade_rules() {
        assert_eq!(upgrade(Special::None, Special::LineV), Special::LineV);
        assert_eq!(upgrade(Special::LineH, Special::None), Special::LineH);
        assert_eq!(upgrade(Special::LineH, Special::LineV), Special::Diamond);
        assert_eq!(upgrade(Special::LineH, Special::LineH), Special::Diamond);
        assert_eq!(upgrade(Special::Diamond, Special::Diamond), Special::Rainbow);
        assert_eq!(upgrade(Special::Diamond, Special::LineH), Special::Diamond);
        assert_eq!(upgrade(Special::LineV, Special::Diamond), Special::Diamond);
        assert_eq!(upgrade(Special::Rainbow, Special::Diamond), Special::Rainbow);
        assert_eq!(upgrade(Special::LineH, Special::Rainbow), Special::Rainbow);
    }
}
