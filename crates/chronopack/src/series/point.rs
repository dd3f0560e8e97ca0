//! Point view over parallel timestamp/value arrays.

/// A single sample: its position in the originating sequence, its timestamp
/// in epoch milliseconds and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<V = f64> {
    /// Position within the originating sequence.
    pub index: usize,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Sample value.
    pub value: V,
}

impl<V> Point<V> {
    /// Creates a new point.
    pub fn new(index: usize, timestamp: i64, value: V) -> Self {
        Self {
            index,
            timestamp,
            value,
        }
    }
}

/// Lazy, restartable stream of points read from two parallel slices.
///
/// Each step reads the element at the same index from both slices. The
/// stream is `Clone`, so restarting is a matter of cloning it or calling
/// [`PointStream::from_index`].
#[derive(Debug)]
pub struct PointStream<'a, V> {
    timestamps: &'a [i64],
    values: &'a [V],
    pos: usize,
}

impl<'a, V> PointStream<'a, V> {
    /// Creates a stream over `timestamps` and `values`.
    ///
    /// Only the common prefix is visited if the slices differ in length;
    /// the series types never let that happen.
    pub fn new(timestamps: &'a [i64], values: &'a [V]) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            timestamps,
            values,
            pos: 0,
        }
    }

    /// Restarts the stream at `index`.
    pub fn from_index(mut self, index: usize) -> Self {
        self.pos = index;
        self
    }

    fn limit(&self) -> usize {
        self.timestamps.len().min(self.values.len())
    }
}

impl<V> Clone for PointStream<'_, V> {
    fn clone(&self) -> Self {
        Self {
            timestamps: self.timestamps,
            values: self.values,
            pos: self.pos,
        }
    }
}

impl<V: Clone> Iterator for PointStream<'_, V> {
    type Item = Point<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.limit() {
            return None;
        }
        let index = self.pos;
        self.pos += 1;
        Some(Point::new(
            index,
            self.timestamps[index],
            self.values[index].clone(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.limit().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<V: Clone> ExactSizeIterator for PointStream<'_, V> {}

/// Sorts parallel arrays by timestamp through the point view.
///
/// The sort is stable, so samples sharing a timestamp keep their insertion
/// order and sorting twice is the same as sorting once.
pub(crate) fn sort_parallel<V: Clone>(timestamps: &[i64], values: &[V]) -> (Vec<i64>, Vec<V>) {
    let mut points: Vec<Point<V>> = PointStream::new(timestamps, values).collect();
    points.sort_by_key(|p| p.timestamp);
    points.into_iter().map(|p| (p.timestamp, p.value)).unzip()
}
