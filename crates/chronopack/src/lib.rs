//! Chronopack - compact storage codec for time series points
//!
//! This crate turns in-memory time series into a compact stored form and
//! back again.
//!
//! # Components
//!
//! - [`MetricTimeSeries`] / [`GenericTimeSeries`]: in-memory series
//! - [`TimestampEncoder`] / [`TimestampDecoder`]: delta-of-delta timestamps
//!   with a drift tolerance and exact end re-alignment
//! - [`ValueIndex`]: value back-references
//! - [`MetricTimeSeriesConverter`]: gzip-framed documents with JSON and
//!   scalar fallbacks
//!
//! # Example
//!
//! ```rust
//! use chronopack::{MetricTimeSeries, MetricTimeSeriesConverter, TimeSeriesConverter};
//!
//! let series = MetricTimeSeries::builder("cpu.usage")
//!     .points(vec![(1000, 0.5), (1010, 0.5), (1020, 0.75)])
//!     .attribute("host", "server1")
//!     .build();
//!
//! let converter = MetricTimeSeriesConverter::new(10);
//! let stored = converter.to_binary(&series);
//! let read = converter.from_binary(&stored, 1000, 1020)?;
//!
//! assert_eq!(read.timestamps().as_slice(), &[1000, 1010, 1020]);
//! assert_eq!(read.values().as_slice(), &[0.5, 0.5, 0.75]);
//! # Ok::<(), chronopack::CodecError>(())
//! ```

#![deny(missing_docs)]

pub mod codec;
pub mod compression;
pub mod config;
pub mod convert;
pub mod error;
pub mod json;
pub mod series;

pub use codec::{QueryRange, TimestampDecoder, TimestampEncoder, ValueIndex};
pub use config::CodecConfig;
pub use convert::{
    BinaryTimeSeries, GenericTimeSeriesConverter, LsofTimeSeriesConverter,
    MetricTimeSeriesConverter, StraceTimeSeriesConverter, TimeSeriesConverter,
};
pub use error::{CodecError, Result};
pub use series::{
    Column, DoubleList, GenericTimeSeries, LongList, Lsof, LsofTimeSeries, MetricTimeSeries,
    Point, Strace, StraceTimeSeries, TimeSeries,
};
