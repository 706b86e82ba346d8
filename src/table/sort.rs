//! Score column ordering

use std::cmp::Ordering;

/// Column holding the score in the evaluation tool's tables (0-based)
pub const DEFAULT_SORT_COLUMN: usize = 1;

/// Parsed value of a score cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SortKey {
    /// Finite real number
    Score(f64),

    /// Anything that is not a finite number
    Malformed,
}

impl SortKey {
    pub fn parse(cell: &str) -> Self {
        match cell.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => SortKey::Score(value),
            _ => SortKey::Malformed,
        }
    }

    /// Descending order; malformed keys are greater than every score and
    /// equal to each other.
    pub fn cmp_descending(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Score(a), SortKey::Score(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (SortKey::Score(_), SortKey::Malformed) => Ordering::Less,
            (SortKey::Malformed, SortKey::Score(_)) => Ordering::Greater,
            (SortKey::Malformed, SortKey::Malformed) => Ordering::Equal,
        }
    }
}
