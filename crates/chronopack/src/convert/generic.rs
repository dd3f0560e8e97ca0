//! Converter for series of structured values.

use crate::codec::proto::Envelope;
use crate::codec::range::QueryRange;
use crate::codec::structured::{self, StructuredValue};
use crate::config;
use crate::convert::{
    deflate, document_for, inflate, json_payload, user_attributes, BinaryTimeSeries,
    TimeSeriesConverter,
};
use crate::error::Result;
use crate::json;
use crate::series::generic::GenericTimeSeries;
use crate::series::list::LongList;
use crate::series::payload::{Lsof, Strace};
use std::borrow::Cow;
use std::marker::PhantomData;
use tracing::{debug, error, info};

/// Converter for system call traces.
pub type StraceTimeSeriesConverter = GenericTimeSeriesConverter<Strace>;

/// Converter for open-file snapshots.
pub type LsofTimeSeriesConverter = GenericTimeSeriesConverter<Vec<Lsof>>;

/// Converts [`GenericTimeSeries`] of structured values to and from stored
/// documents.
///
/// Structured documents have no scalar form; a document with neither binary
/// nor JSON points reads as an empty series.
#[derive(Debug)]
pub struct GenericTimeSeriesConverter<V> {
    tolerance: i32,
    _value: PhantomData<fn() -> V>,
}

impl<V> Clone for GenericTimeSeriesConverter<V> {
    fn clone(&self) -> Self {
        Self::new(self.tolerance)
    }
}

impl<V> GenericTimeSeriesConverter<V> {
    /// Creates a converter encoding with tolerance `ε` milliseconds.
    pub fn new(tolerance: i32) -> Self {
        Self {
            tolerance,
            _value: PhantomData,
        }
    }

    /// The tolerance used when encoding.
    pub fn tolerance(&self) -> i32 {
        self.tolerance
    }
}

impl<V> Default for GenericTimeSeriesConverter<V> {
    fn default() -> Self {
        Self::new(config::default_tolerance())
    }
}

impl<V: StructuredValue> GenericTimeSeriesConverter<V> {
    fn read_points(
        &self,
        binary: &BinaryTimeSeries,
        metric: &str,
        range: &QueryRange,
    ) -> (LongList, Vec<V>) {
        if !binary.data().is_empty() {
            let Some(bytes) = inflate(binary) else {
                return (LongList::new(), Vec::new());
            };
            let decoded = V::Envelope::from_bytes(&bytes).and_then(|envelope| {
                structured::decode::<V>(&envelope, binary.start(), binary.end(), range)
            });
            return decoded.unwrap_or_else(|e| {
                info!(metric, "Could not decode protocol buffers points: {}", e);
                (LongList::new(), Vec::new())
            });
        }

        if let Some(bytes) = json_payload(binary) {
            return json::from_json::<V>(&bytes, range).unwrap_or_else(|e| {
                error!(metric, "Could not read JSON points: {}", e);
                (LongList::new(), Vec::new())
            });
        }

        debug!(metric, "Document carries no points");
        (LongList::new(), Vec::new())
    }
}

impl<V: StructuredValue> TimeSeriesConverter<GenericTimeSeries<V>> for GenericTimeSeriesConverter<V> {
    fn from_binary(
        &self,
        binary: &BinaryTimeSeries,
        query_start: i64,
        query_end: i64,
    ) -> Result<GenericTimeSeries<V>> {
        let range = QueryRange::new(query_start, query_end)?;
        let metric = binary.metric().unwrap_or_default().to_string();
        debug!(metric = metric.as_str(), query_start, query_end, "Reading structured series");

        let (timestamps, values) = self.read_points(binary, &metric, &range);
        Ok(GenericTimeSeries::from_parts(
            metric,
            binary.start(),
            binary.end(),
            timestamps,
            values,
            user_attributes(binary, None),
        ))
    }

    fn to_binary(&self, series: &GenericTimeSeries<V>) -> BinaryTimeSeries {
        let series = if series.is_sorted() {
            Cow::Borrowed(series)
        } else {
            Cow::Owned(series.sorted_copy())
        };
        let envelope = structured::encode::<V, _, _>(series.points(), self.tolerance);
        let data = deflate(series.metric(), &envelope.to_bytes());
        document_for(
            series.metric(),
            series.start(),
            series.end(),
            data,
            series.attributes(),
        )
    }
}
