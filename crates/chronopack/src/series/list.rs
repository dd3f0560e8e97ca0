//! Growable primitive sequences backing the parallel timestamp/value arrays.
//!
//! Codec loops walk these as plain slices; the [`Point`](super::Point) view
//! is only synthesized on demand.

use crate::error::{CodecError, Result};
use std::ops::Index;

/// A growable sequence of signed 64-bit integers (timestamps).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongList(Vec<i64>);

impl LongList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends one element.
    pub fn push(&mut self, value: i64) {
        self.0.push(value);
    }

    /// Appends all elements of `values`.
    pub fn extend_from_slice(&mut self, values: &[i64]) {
        self.0.extend_from_slice(values);
    }

    /// Returns the element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    /// Returns the first element, if any.
    pub fn first(&self) -> Option<i64> {
        self.0.first().copied()
    }

    /// Returns the last element, if any.
    pub fn last(&self) -> Option<i64> {
        self.0.last().copied()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes all elements, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Borrows the raw contents.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Exports the raw contents.
    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&mut self, factor: i64) {
        self.0.iter_mut().for_each(|v| *v = v.wrapping_mul(factor));
    }

    /// Adds `offset` to every element.
    pub fn shift(&mut self, offset: i64) {
        self.0.iter_mut().for_each(|v| *v = v.wrapping_add(offset));
    }

    /// Returns true if the elements are monotonically non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl From<Vec<i64>> for LongList {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl FromIterator<i64> for LongList {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<i64> for LongList {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl Index<usize> for LongList {
    type Output = i64;

    fn index(&self, index: usize) -> &i64 {
        &self.0[index]
    }
}

/// A growable sequence of 64-bit floats (values) with simple statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoubleList(Vec<f64>);

impl DoubleList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends one element.
    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    /// Appends all elements of `values`.
    pub fn extend_from_slice(&mut self, values: &[f64]) {
        self.0.extend_from_slice(values);
    }

    /// Returns the element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes all elements, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Borrows the raw contents.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Exports the raw contents.
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.0.iter_mut().for_each(|v| *v *= factor);
    }

    /// Smallest element, ignoring NaN. `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::min)
    }

    /// Largest element, ignoring NaN. `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::max)
    }

    /// Arithmetic mean. `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator). `None` when empty,
    /// `0.0` for a single element.
    pub fn stddev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let n = self.0.len();
        if n == 1 {
            return Some(0.0);
        }
        let sum_sq: f64 = self.0.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((sum_sq / (n - 1) as f64).sqrt())
    }

    /// Percentile using the quantile-type-7 rule (linear interpolation
    /// between closest ranks).
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidArgument` if `p` is outside `[0, 1]` or
    /// the list is empty.
    pub fn percentile(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(CodecError::InvalidArgument(format!(
                "percentile must be within [0, 1], got {p}"
            )));
        }
        if self.0.is_empty() {
            return Err(CodecError::InvalidArgument(
                "percentile of an empty list".to_string(),
            ));
        }

        let mut sorted = self.0.clone();
        sorted.sort_by(f64::total_cmp);

        // h = (n - 1) * p + 1 with 1-based ranks; shifted to 0-based here.
        let h = (sorted.len() - 1) as f64 * p;
        let lower = h.floor() as usize;
        let fraction = h - h.floor();
        let low = sorted[lower];
        match sorted.get(lower + 1) {
            Some(&high) => Ok(low + fraction * (high - low)),
            None => Ok(low),
        }
    }
}

impl From<Vec<f64>> for DoubleList {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for DoubleList {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<f64> for DoubleList {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl Index<usize> for DoubleList {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}
