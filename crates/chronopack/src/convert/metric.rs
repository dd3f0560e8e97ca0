//! Converter for numeric series.

use crate::codec::metric as codec;
use crate::codec::proto::Envelope;
use crate::codec::range::QueryRange;
use crate::config;
use crate::convert::{
    deflate, document_for, inflate, json_payload, mean_date, scalar_value, user_attributes,
    BinaryTimeSeries, TimeSeriesConverter,
};
use crate::error::Result;
use crate::json;
use crate::series::list::{DoubleList, LongList};
use crate::series::metric::MetricTimeSeries;
use std::borrow::Cow;
use tracing::{debug, error, info};

/// Converts [`MetricTimeSeries`] to and from stored documents.
#[derive(Debug, Clone, Copy)]
pub struct MetricTimeSeriesConverter {
    tolerance: i32,
}

impl MetricTimeSeriesConverter {
    /// Creates a converter encoding with tolerance `ε` milliseconds.
    pub fn new(tolerance: i32) -> Self {
        Self { tolerance }
    }

    /// The tolerance used when encoding.
    pub fn tolerance(&self) -> i32 {
        self.tolerance
    }

    /// Reads the points and, for a scalar document, the field they came from.
    fn read_points(
        &self,
        binary: &BinaryTimeSeries,
        metric: &str,
        range: &QueryRange,
    ) -> (LongList, DoubleList, Option<&'static str>) {
        if !binary.data().is_empty() {
            let Some(bytes) = inflate(binary) else {
                return Default::default();
            };
            let decoded = codec::from_bytes(&bytes)
                .and_then(|envelope| codec::decode(&envelope, binary.start(), binary.end(), range));
            return match decoded {
                Ok((timestamps, values)) => (timestamps, values, None),
                Err(e) => {
                    info!(metric, "Could not decode protocol buffers points: {}", e);
                    Default::default()
                }
            };
        }

        if let Some(bytes) = json_payload(binary) {
            return match json::from_json::<f64>(&bytes, range) {
                Ok((timestamps, values)) => (timestamps, DoubleList::from(values), None),
                Err(e) => {
                    error!(metric, "Could not read JSON points: {}", e);
                    Default::default()
                }
            };
        }

        if let Some((key, value)) = scalar_value(binary) {
            let mut timestamps = LongList::new();
            timestamps.push(mean_date(binary));
            return (timestamps, DoubleList::from(vec![value]), Some(key));
        }

        debug!(metric, "Document carries no points");
        Default::default()
    }
}

impl Default for MetricTimeSeriesConverter {
    fn default() -> Self {
        Self::new(config::default_tolerance())
    }
}

impl TimeSeriesConverter<MetricTimeSeries> for MetricTimeSeriesConverter {
    fn from_binary(
        &self,
        binary: &BinaryTimeSeries,
        query_start: i64,
        query_end: i64,
    ) -> Result<MetricTimeSeries> {
        let range = QueryRange::new(query_start, query_end)?;
        let metric = binary.metric().unwrap_or_default().to_string();
        debug!(metric = metric.as_str(), query_start, query_end, "Reading metric series");

        let (timestamps, values, scalar_key) = self.read_points(binary, &metric, &range);
        Ok(MetricTimeSeries::from_parts(
            metric,
            binary.start(),
            binary.end(),
            timestamps,
            values,
            user_attributes(binary, scalar_key),
        ))
    }

    fn to_binary(&self, series: &MetricTimeSeries) -> BinaryTimeSeries {
        let series = if series.is_sorted() {
            Cow::Borrowed(series)
        } else {
            Cow::Owned(series.sorted_copy())
        };
        let envelope = codec::encode(series.points(), self.tolerance);
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
