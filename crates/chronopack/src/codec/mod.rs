//! Point stream codec.
//!
//! Samples become wire records ([`proto`]) whose timestamps are
//! delta-of-delta encoded ([`timestamp`]). Numeric values are deduplicated
//! through back-references ([`value`]); structured payloads are stored
//! in-line ([`structured`]). Decoding replays the timestamp chain over every
//! record and keeps the points inside a [`QueryRange`].

pub mod metric;
pub mod proto;
pub mod range;
pub mod structured;
pub mod timestamp;
pub mod value;

pub use proto::{Delta, DeltaRecord, Envelope, Points, PointRecord, PointValue};
pub use range::QueryRange;
pub use structured::StructuredValue;
pub use timestamp::{TimestampDecoder, TimestampEncoder};
pub use value::ValueIndex;

use crate::error::Result;
use crate::series::list::LongList;
use crate::series::point::Point;
use tracing::debug;

/// Encodes samples into records, building each record's payload with
/// `make_record(value, record_index)`.
///
/// `None` samples are skipped.
pub(crate) fn encode_records<V, P, I, R, F>(points: I, tolerance: i32, mut make_record: F) -> Vec<R>
where
    I: IntoIterator<Item = P>,
    P: Into<Option<Point<V>>>,
    R: DeltaRecord,
    F: FnMut(&V, usize) -> R,
{
    let mut timestamps = TimestampEncoder::new(tolerance);
    let mut records: Vec<R> = Vec::new();
    let mut samples = points
        .into_iter()
        .filter_map(|sample| {
            let sample: Option<Point<V>> = sample.into();
            if sample.is_none() {
                debug!("Skipping null sample");
            }
            sample
        })
        .peekable();

    while let Some(point) = samples.next() {
        let mut record = make_record(&point.value, records.len());
        let delta = if samples.peek().is_some() {
            timestamps.encode(point.timestamp)
        } else {
            timestamps.finish(point.timestamp, &mut records)
        };
        record.set_delta(delta);
        records.push(record);
    }
    records
}

/// Replays the timestamp chain over `records` and collects the points that
/// fall inside `range`, reading each kept value with `value_at(index)`.
///
/// Either every kept point is returned or an error.
pub(crate) fn decode_records<R, V, F>(
    records: &[R],
    ddc: i32,
    start: i64,
    end: i64,
    range: &QueryRange,
    mut value_at: F,
) -> Result<(LongList, Vec<V>)>
where
    R: DeltaRecord,
    F: FnMut(usize) -> Result<V>,
{
    let mut timestamps = LongList::new();
    let mut values = Vec::new();
    if records.is_empty() || range.excludes(start, end) {
        return Ok((timestamps, values));
    }

    let mut decoder = TimestampDecoder::new(start, end, ddc, records.len());
    for (i, record) in records.iter().enumerate() {
        let t = decoder.next(i, record.delta())?;
        if range.contains(t) {
            timestamps.push(t);
            values.push(value_at(i)?);
        }
    }
    Ok((timestamps, values))
}
