//! Conversion between in-memory series and the stored document.
//!
//! A stored document ([`BinaryTimeSeries`]) carries the series bounds, a
//! gzip-compressed envelope and a map of named fields (the metric name and
//! user attributes). Reading picks the first available payload:
//!
//! 1. the binary envelope, if non-empty;
//! 2. the JSON fallback field `dataAsJson`;
//! 3. the scalar field `function_value`, else `value` (numeric series
//!    only), as a single point at the middle of `[start, end]`;
//! 4. nothing: an empty series keeping the document's bounds.
//!
//! Damaged payloads yield an empty series and a log line; only an invalid
//! query window fails the call.

pub mod generic;
pub mod metric;
pub mod schema;

pub use generic::{GenericTimeSeriesConverter, LsofTimeSeriesConverter, StraceTimeSeriesConverter};
pub use metric::MetricTimeSeriesConverter;

use crate::compression;
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{error, info};

/// Converts between a series type and its stored document.
pub trait TimeSeriesConverter<T> {
    /// Reads the points of `binary` that fall inside `[query_start, query_end]`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidArgument` if either query bound is
    /// negative. Damaged payloads are not errors; they produce an empty
    /// series.
    fn from_binary(&self, binary: &BinaryTimeSeries, query_start: i64, query_end: i64) -> Result<T>;

    /// Builds the stored document for `series`.
    fn to_binary(&self, series: &T) -> BinaryTimeSeries;
}

/// The stored form of a series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryTimeSeries {
    start: i64,
    end: i64,
    data: Vec<u8>,
    fields: BTreeMap<String, Value>,
}

impl BinaryTimeSeries {
    /// Starts building a document.
    pub fn builder() -> BinaryTimeSeriesBuilder {
        BinaryTimeSeriesBuilder::default()
    }

    /// First timestamp of the series.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last timestamp of the series.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// The gzip-compressed envelope (may be empty).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The metric name, if present.
    pub fn metric(&self) -> Option<&str> {
        self.fields.get(schema::METRIC).and_then(Value::as_str)
    }

    /// Looks up a named field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All named fields.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

/// Builder for [`BinaryTimeSeries`].
#[derive(Debug, Clone, Default)]
pub struct BinaryTimeSeriesBuilder {
    document: BinaryTimeSeries,
}

impl BinaryTimeSeriesBuilder {
    /// Sets the first timestamp.
    pub fn start(mut self, start: i64) -> Self {
        self.document.start = start;
        self
    }

    /// Sets the last timestamp.
    pub fn end(mut self, end: i64) -> Self {
        self.document.end = end;
        self
    }

    /// Sets the gzip-compressed envelope.
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.document.data = data;
        self
    }

    /// Sets the metric name.
    pub fn metric(self, metric: impl Into<String>) -> Self {
        self.field(schema::METRIC, metric.into())
    }

    /// Sets a named field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.document.fields.insert(key.into(), value.into());
        self
    }

    /// Finishes the document.
    pub fn build(self) -> BinaryTimeSeries {
        self.document
    }
}

// Shared reading helpers.

/// The inflated envelope bytes, or `None` (logged) when the gzip stream is
/// damaged.
pub(crate) fn inflate(binary: &BinaryTimeSeries) -> Option<Vec<u8>> {
    match compression::decompress(binary.data()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(
                metric = binary.metric().unwrap_or_default(),
                "Could not inflate points: {}", e
            );
            None
        }
    }
}

/// Gzip-compresses an envelope; a failure is logged and stored as no data.
pub(crate) fn deflate(metric: &str, bytes: &[u8]) -> Vec<u8> {
    compression::compress(bytes).unwrap_or_else(|e| {
        error!(metric, "Could not compress points: {}", e);
        Vec::new()
    })
}

/// Bytes of the JSON fallback field, if present.
pub(crate) fn json_payload(binary: &BinaryTimeSeries) -> Option<Vec<u8>> {
    match binary.field(schema::DATA_AS_JSON)? {
        Value::String(text) => Some(text.clone().into_bytes()),
        other => serde_json::to_vec(other).ok(),
    }
}

/// The first numeric scalar field and its key, if any.
pub(crate) fn scalar_value(binary: &BinaryTimeSeries) -> Option<(&'static str, f64)> {
    schema::SCALAR_FIELDS.into_iter().find_map(|key| {
        let value = match binary.field(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        };
        value.map(|value| (key, value))
    })
}

/// Middle of the document's time span.
pub(crate) fn mean_date(binary: &BinaryTimeSeries) -> i64 {
    let start = i128::from(binary.start());
    let span = i128::from(binary.end()) - start;
    // lies between start and end, so it fits back into i64
    (start + span / 2) as i64
}

/// User attributes: every non-reserved field except the payload fields and
/// the scalar key the points were read from.
pub(crate) fn user_attributes(
    binary: &BinaryTimeSeries,
    scalar_key: Option<&str>,
) -> BTreeMap<String, Value> {
    binary
        .fields()
        .iter()
        .filter(|(key, _)| {
            schema::is_user_defined(key)
                && !schema::is_data_field(key)
                && scalar_key != Some(key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Starts a document for a series, copying its attributes.
pub(crate) fn document_for(
    metric: &str,
    start: i64,
    end: i64,
    data: Vec<u8>,
    attributes: &BTreeMap<String, Value>,
) -> BinaryTimeSeries {
    let mut builder = BinaryTimeSeries::builder()
        .start(start)
        .end(end)
        .data(data)
        .metric(metric);
    for (key, value) in attributes {
        if schema::is_reserved(key) {
            info!(metric, key = key.as_str(), "Dropping attribute with reserved name");
            continue;
        }
        builder = builder.field(key.clone(), value.clone());
    }
    builder.build()
}
