//! Character ranges over the transient input buffer

use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of character indices.
///
/// `start <= end` holds for every constructed value; reversed bounds are
/// swapped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Create a range, ordering the bounds
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// An empty range at `offset` (a caret)
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Range covering `len` characters from `start`
    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both bounds into `[0, len]`
    pub fn clamp_to(&self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Whether the range lies entirely within a buffer of `len` characters
    pub fn fits(&self, len: usize) -> bool {
        self.end <= len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_orders_bounds() {
        let range = TextRange::new(5, 2);
        assert_eq!(range.start(), 2);
        assert_eq!(range.end(), 5);
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_caret_is_empty() {
        assert!(TextRange::caret(4).is_empty());
        assert!(!TextRange::with_len(4, 1).is_empty());
        assert_eq!(TextRange::with_len(usize::MAX, 3).end(), usize::MAX);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(TextRange::new(3, 50).clamp_to(10), TextRange::new(3, 10));
        assert_eq!(TextRange::new(30, 50).clamp_to(10), TextRange::caret(10));
        assert!(TextRange::new(3, 10).fits(10));
        assert!(!TextRange::new(3, 11).fits(10));
    }

    proptest! {
        #[test]
        fn prop_constructed_ranges_are_ordered(a in 0usize..10_000, b in 0usize..10_000) {
            let range = TextRange::new(a, b);
            prop_assert!(range.start() <= range.end());
            prop_assert_eq!(range.is_empty(), a == b);
        }

        #[test]
        fn prop_clamped_ranges_fit(a in 0usize..10_000, b in 0usize..10_000, len in 0usize..5_000) {
            let clamped = TextRange::new(a, b).clamp_to(len);
            prop_assert!(clamped.fits(len));
            prop_assert!(clamped.start() <= clamped.end());
        }
    }
}
