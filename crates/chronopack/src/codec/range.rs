//! Inclusive `[from, to]` query window applied while decoding.

use crate::error::{CodecError, Result};

/// Inclusive time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRange {
    from: i64,
    to: i64,
}

impl QueryRange {
    /// Creates a window from caller-supplied bounds.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidArgument` if either bound is negative.
    pub fn new(from: i64, to: i64) -> Result<Self> {
        if from < 0 || to < 0 {
            return Err(CodecError::InvalidArgument(format!(
                "query range [{from}, {to}] has a negative bound"
            )));
        }
        Ok(Self { from, to })
    }

    /// A window that keeps every point.
    pub fn unbounded() -> Self {
        Self {
            from: i64::MIN,
            to: i64::MAX,
        }
    }

    /// Lower bound.
    pub fn from(&self) -> i64 {
        self.from
    }

    /// Upper bound.
    pub fn to(&self) -> i64 {
        self.to
    }

    /// Returns true if `timestamp` lies inside the window.
    pub fn contains(&self, timestamp: i64) -> bool {
        self.from <= timestamp && timestamp <= self.to
    }

    /// Returns true when no point of a series spanning `[start, end]` can
    /// fall inside the window.
    pub fn excludes(&self, start: i64, end: i64) -> bool {
        self.to < start || self.from > end || self.from > self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_bounds_rejected() {
        assert!(matches!(
            QueryRange::new(-1, 100),
            Err(CodecError::InvalidArgument(_))
        ));
        assert!(QueryRange::new(0, -1).is_err());
        assert!(QueryRange::new(0, 0).is_ok());
    }

    #[test]
    fn test_excludes() {
        let range = QueryRange::new(100, 200).unwrap();
        assert!(range.excludes(300, 400));
        assert!(range.excludes(0, 50));
        assert!(!range.excludes(150, 400));
        assert!(QueryRange::new(200, 100).unwrap().excludes(0, 1000));
        assert!(!QueryRange::unbounded().excludes(i64::MIN, i64::MAX));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = QueryRange::new(10, 20).unwrap();
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(21));
    }
}
