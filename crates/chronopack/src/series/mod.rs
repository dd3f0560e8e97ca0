//! In-memory time series: primitive sequences, the point view and the
//! metric/structured series types built on them.

pub mod generic;
pub mod list;
pub mod metric;
pub mod payload;
pub mod point;
pub mod timeseries;

pub use generic::{GenericTimeSeries, GenericTimeSeriesBuilder, LsofTimeSeries, StraceTimeSeries};
pub use list::{DoubleList, LongList};
pub use metric::{MetricTimeSeries, MetricTimeSeriesBuilder};
pub use payload::{Lsof, LsofBuilder, Strace};
pub use point::{Point, PointStream};
pub use timeseries::{Column, TimeSeries, TimeSeriesBuilder};
