//! Numeric point stream: timestamps plus deduplicated `f64` values.

use crate::codec::proto::{Envelope, PointRecord, Points};
use crate::codec::range::QueryRange;
use crate::codec::value::{self, ValueIndex};
use crate::codec::{decode_records, encode_records};
use crate::error::Result;
use crate::series::list::{DoubleList, LongList};
use crate::series::point::Point;

/// Encodes numeric samples with tolerance `ε`.
///
/// Accepts `Point`s or `Option<Point>`s; `None` entries are skipped. The
/// samples must already be sorted by timestamp.
///
/// # Example
///
/// ```rust
/// use chronopack::codec::metric;
/// use chronopack::series::Point;
///
/// let points = (0..4).map(|i| Point::new(i, 1000 + 10 * i as i64, 7.5));
/// let envelope = metric::encode(points, 10);
/// assert_eq!(envelope.p.len(), 4);
/// assert_eq!(envelope.ddc, 10);
/// ```
pub fn encode<I, P>(points: I, tolerance: i32) -> Points
where
    I: IntoIterator<Item = P>,
    P: Into<Option<Point<f64>>>,
{
    let mut values = ValueIndex::new();
    let records = encode_records(points, tolerance, |value: &f64, index| PointRecord {
        t: None,
        value: Some(values.encode(*value, index)),
    });
    Points::from_records(records, tolerance)
}

/// Decodes an envelope belonging to an outer record spanning
/// `[start, end]`, keeping the points inside `range`.
///
/// # Errors
///
/// Returns `CodecError::CorruptPayload` when a record carries an invalid
/// delta or value reference.
pub fn decode(
    envelope: &Points,
    start: i64,
    end: i64,
    range: &QueryRange,
) -> Result<(LongList, DoubleList)> {
    let records = envelope.records();
    let (timestamps, values) = decode_records(records, envelope.ddc(), start, end, range, |i| {
        value::resolve(records, i)
    })?;
    Ok((timestamps, DoubleList::from(values)))
}

/// Serializes an envelope (before gzip).
pub fn to_bytes(envelope: &Points) -> Vec<u8> {
    envelope.to_bytes()
}

/// Parses an envelope from inflated bytes.
///
/// # Errors
///
/// Returns `CodecError::Decode` if the bytes are not a valid envelope.
pub fn from_bytes(bytes: &[u8]) -> Result<Points> {
    Points::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::proto::{Delta, PointValue};

    fn points(timestamps: &[i64], values: &[f64]) -> Vec<Point<f64>> {
        timestamps
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (t, v))| Point::new(i, *t, *v))
            .collect()
    }

    #[test]
    fn test_uniform_cadence() {
        let ts = [1000, 1010, 1020, 1030, 1040];
        let vs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let envelope = encode(points(&ts, &vs), 10);

        assert_eq!(envelope.p.len(), 5);
        assert!(envelope.p[1..4].iter().all(|r| r.t.is_none()));
        assert!(envelope.p[4].t.is_some());

        let (t, v) = decode(&envelope, 1000, 1040, &QueryRange::unbounded()).unwrap();
        assert_eq!(t.as_slice(), &ts);
        assert_eq!(v.as_slice(), &vs);
    }

    #[test]
    fn test_repeated_values() {
        let envelope = encode(points(&[0, 10, 20, 30], &[7.5; 4]), 10);
        assert_eq!(envelope.p[0].value, Some(PointValue::V(7.5)));
        for record in &envelope.p[1..] {
            assert_eq!(record.value, Some(PointValue::VIndex(0)));
        }
        let (_, v) = decode(&envelope, 0, 30, &QueryRange::unbounded()).unwrap();
        assert_eq!(v.as_slice(), &[7.5; 4]);
    }

    #[test]
    fn test_null_samples_skipped() {
        let samples = vec![
            Some(Point::new(0, 0, 1.0)),
            None,
            Some(Point::new(2, 10, 2.0)),
            None,
        ];
        let envelope = encode(samples, 10);
        assert_eq!(envelope.p.len(), 2);
        let (t, _) = decode(&envelope, 0, 10, &QueryRange::unbounded()).unwrap();
        assert_eq!(t.as_slice(), &[0, 10]);
    }

    #[test]
    fn test_empty_input() {
        let envelope = encode(Vec::<Point<f64>>::new(), 10);
        assert!(envelope.p.is_empty());
        let (t, v) = decode(&envelope, 0, 0, &QueryRange::unbounded()).unwrap();
        assert!(t.is_empty() && v.is_empty());
    }

    #[test]
    fn test_range_filter_still_advances_chain() {
        let ts = [100, 200, 300, 400, 500];
        let envelope = encode(points(&ts, &[1.0, 2.0, 3.0, 4.0, 5.0]), 0);
        let range = QueryRange::new(250, 450).unwrap();
        let (t, v) = decode(&envelope, 100, 500, &range).unwrap();
        assert_eq!(t.as_slice(), &[300, 400]);
        assert_eq!(v.as_slice(), &[3.0, 4.0]);

        let outside = QueryRange::new(600, 700).unwrap();
        assert!(decode(&envelope, 100, 500, &outside).unwrap().0.is_empty());
    }

    #[test]
    fn test_corrupt_reference_fails_whole_decode() {
        let mut envelope = encode(points(&[0, 10], &[1.0, 2.0]), 0);
        envelope.p[1].value = Some(PointValue::VIndex(5));
        assert!(decode(&envelope, 0, 10, &QueryRange::unbounded()).is_err());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let envelope = encode(points(&[0, 5_000_000_000], &[1.0, 1.0]), 10);
        assert_eq!(envelope.p[1].t, Some(Delta::Large(5_000_000_000)));
        let parsed = from_bytes(&to_bytes(&envelope)).unwrap();
        assert_eq!(parsed, envelope);
    }
}
