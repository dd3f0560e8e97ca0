//! Time series over structured values.

use crate::series::payload::{Lsof, Strace};
use crate::series::timeseries::{TimeSeries, TimeSeriesBuilder};

/// A time series whose values are structured payloads.
pub type GenericTimeSeries<T> = TimeSeries<Vec<T>>;

/// Builder for [`GenericTimeSeries`].
pub type GenericTimeSeriesBuilder<T> = TimeSeriesBuilder<Vec<T>>;

/// Time series of traced system calls.
pub type StraceTimeSeries = GenericTimeSeries<Strace>;

/// Time series of open-file snapshots, one list of rows per sample.
pub type LsofTimeSeries = GenericTimeSeries<Vec<Lsof>>;
