//! Property-based tests for the point stream codec.
//!
//! Inputs are sorted by construction: the codec does not define behaviour
//! for out-of-order timestamps.

use chronopack::codec::metric::{decode, encode, from_bytes, to_bytes};
use chronopack::codec::{Delta, PointValue, QueryRange};
use chronopack::Point;
use proptest::prelude::*;

/// Sorted timestamps with a jittered cadence.
fn jittered_timestamps() -> impl Strategy<Value = Vec<i64>> {
    (
        0i64..1_000_000_000_000,
        1i64..10_000,
        prop::collection::vec(-40i64..40, 0..200),
    )
        .prop_map(|(base, cadence, jitter)| {
            let mut timestamps = vec![base];
            let mut current = base;
            for j in jitter {
                current += (cadence + j).max(0);
                timestamps.push(current);
            }
            timestamps
        })
}

/// Values with plenty of repeats, plus arbitrary doubles (NaN included).
fn values(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            prop::sample::select(vec![0.0, 1.5, -2.25, 100.0]),
            any::<f64>(),
        ],
        len,
    )
}

fn series_strategy() -> impl Strategy<Value = (Vec<i64>, Vec<f64>)> {
    jittered_timestamps().prop_flat_map(|ts| {
        let len = ts.len();
        (Just(ts), values(len))
    })
}

fn points(timestamps: &[i64], values: &[f64]) -> Vec<Point<f64>> {
    timestamps
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (t, v))| Point::new(i, *t, *v))
        .collect()
}

fn decode_all(timestamps: &[i64], bytes: &[u8]) -> (Vec<i64>, Vec<f64>) {
    let envelope = from_bytes(bytes).unwrap();
    let (t, v) = decode(
        &envelope,
        timestamps[0],
        *timestamps.last().unwrap(),
        &QueryRange::unbounded(),
    )
    .unwrap();
    (t.into_vec(), v.into_vec())
}

proptest! {
    /// First and last timestamps come back exactly for any tolerance.
    #[test]
    fn test_endpoints_exact((ts, vs) in series_strategy(), tolerance in 0i32..50) {
        let envelope = encode(points(&ts, &vs), tolerance);
        prop_assert_eq!(envelope.p.len(), ts.len());

        let (decoded, _) = decode_all(&ts, &to_bytes(&envelope));
        prop_assert_eq!(decoded.len(), ts.len());
        prop_assert_eq!(decoded[0], ts[0]);
        prop_assert_eq!(decoded.last(), ts.last());
    }

    /// Intermediate timestamps drift by at most `ε` per record.
    #[test]
    fn test_intermediate_drift_bounded((ts, vs) in series_strategy(), tolerance in 0i32..50) {
        let envelope = encode(points(&ts, &vs), tolerance);
        let (decoded, _) = decode_all(&ts, &to_bytes(&envelope));
        prop_assert_eq!(decoded.len(), ts.len());
        for (i, (d, t)) in decoded.iter().zip(&ts).enumerate() {
            let bound = i64::from(tolerance) * i as i64;
            prop_assert!(
                (d - t).abs() <= bound,
                "point {}: decoded {} input {} bound {}", i, d, t, bound
            );
        }
    }

    /// Values are exact, bit for bit.
    #[test]
    fn test_values_exact((ts, vs) in series_strategy(), tolerance in -1i32..50) {
        let envelope = encode(points(&ts, &vs), tolerance);
        let (_, decoded) = decode_all(&ts, &to_bytes(&envelope));
        let expected: Vec<u64> = vs.iter().map(|v| v.to_bits()).collect();
        let actual: Vec<u64> = decoded.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Every back-reference points at an earlier record with a concrete value.
    #[test]
    fn test_back_references_well_formed((ts, vs) in series_strategy()) {
        let envelope = encode(points(&ts, &vs), 10);
        for (i, record) in envelope.p.iter().enumerate() {
            if let Some(PointValue::VIndex(k)) = record.value {
                let k = k as usize;
                prop_assert!(k < i);
                prop_assert!(matches!(envelope.p[k].value, Some(PointValue::V(_))));
            }
        }
    }

    /// Zero tolerance reconstructs every timestamp.
    #[test]
    fn test_zero_tolerance_is_lossless((ts, vs) in series_strategy()) {
        let envelope = encode(points(&ts, &vs), 0);
        let (decoded, _) = decode_all(&ts, &to_bytes(&envelope));
        prop_assert_eq!(decoded, ts);
    }

    /// Filtering the decoded stream equals filtering the input.
    #[test]
    fn test_range_filter_matches_input(
        (ts, vs) in series_strategy(),
        a in 0usize..200,
        b in 0usize..200,
    ) {
        let lo = ts[a.min(b) % ts.len()];
        let hi = ts[a.max(b) % ts.len()].max(lo);
        let range = QueryRange::new(lo, hi).unwrap();

        let envelope = encode(points(&ts, &vs), 0);
        let (t, v) = decode(&envelope, ts[0], *ts.last().unwrap(), &range).unwrap();

        let expected: Vec<(i64, u64)> = ts
            .iter()
            .zip(&vs)
            .filter(|(t, _)| (lo..=hi).contains(*t))
            .map(|(t, v)| (*t, v.to_bits()))
            .collect();
        let actual: Vec<(i64, u64)> = t
            .as_slice()
            .iter()
            .zip(v.as_slice())
            .map(|(t, v)| (*t, v.to_bits()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Re-encoding a decoded uniform series gives the same bytes.
    #[test]
    fn test_reencode_is_stable(
        base in 0i64..1_000_000_000_000,
        cadence in 51i64..100_000,
        count in 1usize..300,
        tolerance in 0i32..50,
    ) {
        let ts: Vec<i64> = (0..count as i64).map(|i| base + i * cadence).collect();
        let vs: Vec<f64> = (0..count).map(|i| (i % 5) as f64).collect();

        let first = to_bytes(&encode(points(&ts, &vs), tolerance));
        let (dt, dv) = decode_all(&ts, &first);
        prop_assert_eq!(&dt, &ts);
        let second = to_bytes(&encode(points(&dt, &dv), tolerance));
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_uniform_cadence_scenario() {
    let ts = [1000, 1010, 1020, 1030, 1040];
    let vs = [1.0, 2.0, 3.0, 4.0, 5.0];
    let envelope = encode(points(&ts, &vs), 10);

    assert_eq!(envelope.p.len(), 5);
    for record in &envelope.p[1..4] {
        assert!(record.t.is_none());
    }
    assert!(envelope.p[4].t.is_some());

    let (t, v) = decode_all(&ts, &to_bytes(&envelope));
    assert_eq!(t, ts);
    assert_eq!(v, vs);
}

#[test]
fn test_repeated_values_scenario() {
    let envelope = encode(points(&[0, 10, 20, 30], &[7.5; 4]), 10);
    assert_eq!(envelope.p[0].value, Some(PointValue::V(7.5)));
    for record in &envelope.p[1..] {
        assert_eq!(record.value, Some(PointValue::VIndex(0)));
    }
}

#[test]
fn test_drift_past_end_scenario() {
    let ts = [0, 9, 19, 28, 41];
    let envelope = encode(points(&ts, &[1.0; 5]), 10);
    let (t, _) = decode_all(&ts, &to_bytes(&envelope));
    assert_eq!(t[4], 41);
}

#[test]
fn test_narrow_wide_boundary() {
    let narrow = i64::from(i32::MAX);
    let ts = [0, narrow, 2 * narrow + 1];
    let envelope = encode(points(&ts, &[1.0, 2.0, 3.0]), 0);
    assert_eq!(envelope.p[1].t, Some(Delta::Small(i32::MAX as u32)));
    assert_eq!(envelope.p[2].t, Some(Delta::Large(1 << 31)));
    let (t, _) = decode_all(&ts, &to_bytes(&envelope));
    assert_eq!(t, ts);
}

#[test]
fn test_single_point_window() {
    let ts = [100, 200, 300, 400, 500];
    let envelope = encode(points(&ts, &[1.0, 2.0, 3.0, 4.0, 5.0]), 10);
    let range = QueryRange::new(300, 300).unwrap();
    let (t, v) = decode(&envelope, 100, 500, &range).unwrap();
    assert_eq!(t.as_slice(), &[300]);
    assert_eq!(v.as_slice(), &[3.0]);
}
