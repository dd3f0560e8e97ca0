//! Series core shared by the numeric and structured series.

use crate::error::{CodecError, Result};
use crate::series::list::{DoubleList, LongList};
use crate::series::point::{sort_parallel, PointStream};
use serde_json::Value;
use std::collections::BTreeMap;

/// Storage for the value side of a series.
pub trait Column: Clone + Default {
    /// One stored value.
    type Item: Clone;

    /// Appends one value.
    fn push(&mut self, value: Self::Item);

    /// Appends a slice of values.
    fn extend_from_slice(&mut self, values: &[Self::Item]);

    /// The values as a slice.
    fn as_slice(&self) -> &[Self::Item];

    /// Removes all values.
    fn clear(&mut self);

    /// Builds a column from owned values.
    fn from_vec(values: Vec<Self::Item>) -> Self;
}

impl<T: Clone> Column for Vec<T> {
    type Item = T;

    fn push(&mut self, value: T) {
        Vec::push(self, value);
    }

    fn extend_from_slice(&mut self, values: &[T]) {
        Vec::extend_from_slice(self, values);
    }

    fn as_slice(&self) -> &[T] {
        Vec::as_slice(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn from_vec(values: Vec<T>) -> Self {
        values
    }
}

impl Column for DoubleList {
    type Item = f64;

    fn push(&mut self, value: f64) {
        DoubleList::push(self, value);
    }

    fn extend_from_slice(&mut self, values: &[f64]) {
        DoubleList::extend_from_slice(self, values);
    }

    fn as_slice(&self) -> &[f64] {
        DoubleList::as_slice(self)
    }

    fn clear(&mut self) {
        DoubleList::clear(self);
    }

    fn from_vec(values: Vec<f64>) -> Self {
        DoubleList::from(values)
    }
}

/// A time series keyed by a metric name and a bag of attributes.
///
/// Timestamps and values live in two parallel sequences of equal length.
/// `start` and `end` are the first and last timestamps when the series has
/// points; an empty series keeps the bounds it was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<C> {
    metric: String,
    timestamps: LongList,
    values: C,
    start: i64,
    end: i64,
    attributes: BTreeMap<String, Value>,
}

impl<C: Column> TimeSeries<C> {
    /// Starts building a series for `metric`.
    pub fn builder(metric: impl Into<String>) -> TimeSeriesBuilder<C> {
        TimeSeriesBuilder::new(metric)
    }

    /// The metric name.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// First timestamp, or the configured start of an empty series.
    pub fn start(&self) -> i64 {
        self.timestamps.first().unwrap_or(self.start)
    }

    /// Last timestamp, or the configured end of an empty series.
    pub fn end(&self) -> i64 {
        self.timestamps.last().unwrap_or(self.end)
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true if the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The timestamp sequence.
    pub fn timestamps(&self) -> &LongList {
        &self.timestamps
    }

    /// The value sequence.
    pub fn values(&self) -> &C {
        &self.values
    }

    /// Timestamp of the point at `index`.
    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.timestamps.get(index)
    }

    /// Value of the point at `index`.
    pub fn value(&self, index: usize) -> Option<&C::Item> {
        self.values.as_slice().get(index)
    }

    /// Looks up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// All attributes.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Lazily streams the points in storage order.
    pub fn points(&self) -> PointStream<'_, C::Item> {
        PointStream::new(self.timestamps.as_slice(), self.values.as_slice())
    }

    /// Returns true if timestamps are monotonically non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.timestamps.is_sorted()
    }

    /// Appends a single point.
    pub fn add(&mut self, timestamp: i64, value: C::Item) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    /// Appends parallel slices of timestamps and values.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidArgument` if the slices differ in length.
    pub fn add_all(&mut self, timestamps: &[i64], values: &[C::Item]) -> Result<()> {
        if timestamps.len() != values.len() {
            return Err(CodecError::InvalidArgument(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        self.timestamps.extend_from_slice(timestamps);
        self.values.extend_from_slice(values);
        Ok(())
    }

    /// Sorts the points by timestamp (stable).
    pub fn sort(&mut self) {
        if self.size() < 2 || self.is_sorted() {
            return;
        }
        let (timestamps, values) =
            sort_parallel(self.timestamps.as_slice(), self.values.as_slice());
        self.timestamps = LongList::from(timestamps);
        self.values = C::from_vec(values);
    }

    /// Removes all points. Attributes are kept.
    pub fn clear(&mut self) {
        self.timestamps.clear();
        self.values.clear();
    }

    /// Appends the points of `other` and merges its attributes.
    ///
    /// Differing values for the same attribute are collected into a JSON
    /// array of distinct values.
    pub fn merge(&mut self, other: &TimeSeries<C>) {
        self.timestamps
            .extend_from_slice(other.timestamps.as_slice());
        self.values.extend_from_slice(other.values.as_slice());
        for (key, value) in &other.attributes {
            merge_attribute(&mut self.attributes, key, value);
        }
    }

    /// Returns a copy whose points are sorted by timestamp.
    pub(crate) fn sorted_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.sort();
        copy
    }

    pub(crate) fn from_parts(
        metric: String,
        start: i64,
        end: i64,
        timestamps: LongList,
        values: C,
        attributes: BTreeMap<String, Value>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.as_slice().len());
        Self {
            metric,
            timestamps,
            values,
            start,
            end,
            attributes,
        }
    }
}

fn merge_attribute(attributes: &mut BTreeMap<String, Value>, key: &str, value: &Value) {
    match attributes.get_mut(key) {
        None => {
            attributes.insert(key.to_string(), value.clone());
        }
        Some(existing) if existing == value => {}
        Some(Value::Array(items)) => {
            if !items.contains(value) {
                items.push(value.clone());
            }
        }
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, value.clone()]);
        }
    }
}

/// Builder for [`TimeSeries`].
#[derive(Debug, Clone)]
pub struct TimeSeriesBuilder<C> {
    series: TimeSeries<C>,
}

impl<C: Column> TimeSeriesBuilder<C> {
    /// Creates a builder for an empty series named `metric`.
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            series: TimeSeries {
                metric: metric.into(),
                timestamps: LongList::new(),
                values: C::default(),
                start: 0,
                end: 0,
                attributes: BTreeMap::new(),
            },
        }
    }

    /// Start bound reported while the series has no points.
    pub fn start(mut self, start: i64) -> Self {
        self.series.start = start;
        self
    }

    /// End bound reported while the series has no points.
    pub fn end(mut self, end: i64) -> Self {
        self.series.end = end;
        self
    }

    /// Adds one point.
    pub fn point(mut self, timestamp: i64, value: C::Item) -> Self {
        self.series.add(timestamp, value);
        self
    }

    /// Adds (timestamp, value) pairs.
    pub fn points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = (i64, C::Item)>,
    {
        for (timestamp, value) in points {
            self.series.add(timestamp, value);
        }
        self
    }

    /// Sets a single attribute.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.series.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets several attributes.
    pub fn attributes<I, K>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.series
            .attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Finishes the series.
    pub fn build(self) -> TimeSeries<C> {
        self.series
    }
}
