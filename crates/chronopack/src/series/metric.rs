//! Numeric time series keyed by a metric name and a bag of attributes.

use crate::series::list::DoubleList;
use crate::series::timeseries::{TimeSeries, TimeSeriesBuilder};

/// A numeric time series.
pub type MetricTimeSeries = TimeSeries<DoubleList>;

/// Builder for [`MetricTimeSeries`].
pub type MetricTimeSeriesBuilder = TimeSeriesBuilder<DoubleList>;
