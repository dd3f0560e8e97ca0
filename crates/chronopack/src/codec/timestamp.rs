//! Delta-of-delta timestamp codec with drift tracking.
//!
//! # Encoding
//!
//! Each sample after the first is compared against the cadence the decoder
//! will assume. When the offset to the previous sample is within the
//! tolerance `ε` of the previous offset and the accumulated drift stays
//! small, the record carries no delta at all (an *implicit* record) and the
//! decoder re-applies its running offset. Otherwise the record carries an
//! explicit delta. If implicit records preceded it, the delta is stored as
//! a *base point*, compensated by the last drift, and the decoder resets its
//! running offset to `ε` after applying it.
//!
//! The last sample is special: the encoder simulates the decoder over the
//! records emitted so far and stores whatever offset is needed to land
//! exactly on the true last timestamp. If the simulated clock already ran
//! past it, the excess is taken back from earlier explicit deltas.
//!
//! # Decoding
//!
//! ```text
//! running = ε, current = start
//! record 0        -> start
//! t_small/t_large -> running = delta; current += running
//! tb_small/...    -> current += delta; running = ε
//! no delta        -> current += running
//! ```
//!
//! A negative tolerance disables the layer: no deltas are stored and the
//! decoder spreads the points evenly between the record's start and end.

use crate::codec::proto::{Delta, DeltaRecord};
use crate::error::Result;
use tracing::{debug, warn};

/// Encoder state for one series.
///
/// Feed every sample but the last to [`encode`](Self::encode) and the last
/// one to [`finish`](Self::finish).
///
/// # Memory
///
/// The encoder keeps a copy of every timestamp it is fed (8 bytes per
/// sample) so that [`finish`](Self::finish) can fall back to exact deltas
/// when drift cannot be re-aligned. Encoding a series therefore holds
/// `O(n)` extra memory until the encoder is dropped.
#[derive(Debug, Clone)]
pub struct TimestampEncoder {
    tolerance: i64,
    started: bool,
    start_t: i64,
    prev_t: i64,
    prev_offset: i64,
    prev_drift: i64,
    since_anchor: i64,
    last_anchor_t: i64,
    last_anchor_offset: i64,
    // exact inputs, kept for the terminal fallback
    seen: Vec<i64>,
}

impl TimestampEncoder {
    /// Creates an encoder for tolerance `ε` in milliseconds.
    ///
    /// `ε = 0` stores every delta explicitly; a negative `ε` stores none.
    pub fn new(tolerance: i32) -> Self {
        let tolerance = i64::from(tolerance);
        Self {
            tolerance,
            started: false,
            start_t: 0,
            prev_t: 0,
            prev_offset: 0,
            prev_drift: 0,
            since_anchor: 0,
            last_anchor_t: 0,
            last_anchor_offset: tolerance.max(0),
            seen: Vec::new(),
        }
    }

    /// The tolerance this encoder was created with.
    pub fn tolerance(&self) -> i32 {
        self.tolerance as i32
    }

    /// Returns true when the timestamp layer is disabled (`ε < 0`).
    pub fn is_disabled(&self) -> bool {
        self.tolerance < 0
    }

    /// Encodes a sample that is not the last one of the series.
    ///
    /// Returns the delta to store on the sample's record, or `None` for an
    /// implicit record.
    pub fn encode(&mut self, t: i64) -> Option<Delta> {
        if self.is_disabled() {
            return None;
        }
        self.seen.push(t);
        if !self.started {
            self.started = true;
            self.start_t = t;
            self.last_anchor_t = t;
            self.prev_t = t;
            return None;
        }

        let eps = self.tolerance;
        let offset = t.wrapping_sub(self.prev_t);
        let almost_equal = offset.abs_diff(self.prev_offset) <= eps as u64;
        let drift = if almost_equal {
            self.last_anchor_t
                .saturating_add(self.last_anchor_offset.saturating_mul(self.since_anchor + 1))
                .saturating_sub(t)
        } else {
            0
        };
        let no_drift = self.since_anchor == 0 || drift == 0 || drift < eps / 2;

        let delta = if eps > 0 && almost_equal && no_drift && drift >= 0 {
            self.since_anchor += 1;
            None
        } else {
            let delta = if self.since_anchor > 0 && offset > self.prev_drift {
                Delta::base(offset.saturating_sub(self.prev_drift))
            } else {
                Delta::normal(offset)
            };
            self.last_anchor_t = t;
            // A base point makes the decoder's running offset ε, not the
            // stored delta, so implicit records after it are predicted with ε.
            self.last_anchor_offset = if delta.is_base() { eps } else { offset };
            self.since_anchor = 0;
            Some(delta)
        };

        self.prev_drift = drift;
        self.prev_offset = offset;
        self.prev_t = t;
        delta
    }

    /// Encodes the last sample of the series.
    ///
    /// `emitted` holds the records already produced for the earlier samples,
    /// in order. They may be rewritten so that the decoded last timestamp
    /// equals `t` exactly.
    pub fn finish<R: DeltaRecord>(&mut self, t: i64, emitted: &mut [R]) -> Option<Delta> {
        if self.is_disabled() {
            return None;
        }
        self.seen.push(t);
        if !self.started {
            // single-sample series: decodes to the record's start
            self.started = true;
            self.start_t = t;
            return None;
        }

        let calc_end = simulate(self.start_t, self.tolerance(), emitted);
        let mut offset_to_end = t.wrapping_sub(calc_end);
        if offset_to_end >= 0 {
            return Some(Delta::normal(offset_to_end));
        }

        if emitted.len() > 1 {
            let divisor = (emitted.len() - 1) as i64;
            let avg = ceil_div(offset_to_end.saturating_neg().saturating_add(self.tolerance), divisor);
            for record in emitted.iter_mut().skip(1) {
                if offset_to_end >= 0 {
                    break;
                }
                let Some(delta) = record.delta() else {
                    continue;
                };
                let stored = delta.value();
                let cut = avg.min(stored).min(-offset_to_end);
                if cut > 0 {
                    record.set_delta(Some(delta.with_value(stored - cut)));
                    offset_to_end += cut;
                }
            }

            let residual = t.wrapping_sub(simulate(self.start_t, self.tolerance(), emitted));
            if residual >= 0 {
                debug!(residual, records = emitted.len() + 1, "re-aligned series end with base point");
                return Some(Delta::base(residual));
            }
        }

        warn!(
            records = emitted.len() + 1,
            "Timestamp drift could not be re-aligned, storing exact deltas"
        );
        for (i, record) in emitted.iter_mut().enumerate().skip(1) {
            record.set_delta(Some(Delta::normal(self.seen[i].wrapping_sub(self.seen[i - 1]))));
        }
        let n = self.seen.len();
        Some(Delta::normal(self.seen[n - 1].wrapping_sub(self.seen[n - 2])))
    }
}

fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator / divisor;
    if numerator % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}

/// Replays the decoder over `records` and returns the last reconstructed
/// timestamp (`start` when there are no records).
pub fn simulate<R: DeltaRecord>(start: i64, tolerance: i32, records: &[R]) -> i64 {
    let mut clock = Clock::new(start, tolerance);
    let mut current = start;
    for (i, record) in records.iter().enumerate() {
        current = if i == 0 {
            start
        } else {
            clock.advance(record.delta())
        };
    }
    current
}

#[derive(Debug, Clone)]
struct Clock {
    tolerance: i64,
    running: i64,
    current: i64,
}

impl Clock {
    fn new(start: i64, tolerance: i32) -> Self {
        let tolerance = i64::from(tolerance).max(0);
        Self {
            tolerance,
            running: tolerance,
            current: start,
        }
    }

    fn advance(&mut self, delta: Option<Delta>) -> i64 {
        match delta {
            Some(delta) if delta.is_base() => {
                self.current = self.current.saturating_add(delta.value());
                self.running = self.tolerance;
            }
            Some(delta) => {
                self.running = delta.value();
                self.current = self.current.saturating_add(self.running);
            }
            None => {
                self.current = self.current.saturating_add(self.running);
            }
        }
        self.current
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Chained(Clock),
    Spread { start: i64, end: i64, count: usize },
}

/// Reconstructs timestamps record by record.
#[derive(Debug, Clone)]
pub struct TimestampDecoder {
    start: i64,
    mode: Mode,
}

impl TimestampDecoder {
    /// Creates a decoder for `count` records stored with tolerance `ddc`
    /// under an outer record spanning `[start, end]`.
    pub fn new(start: i64, end: i64, ddc: i32, count: usize) -> Self {
        let mode = if ddc < 0 {
            Mode::Spread { start, end, count }
        } else {
            Mode::Chained(Clock::new(start, ddc))
        };
        Self { start, mode }
    }

    /// Timestamp of record `index`, whose stored delta is `delta`.
    ///
    /// Records must be fed in order, starting at 0.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::CorruptPayload` for a narrow delta that does not
    /// fit in 31 bits.
    pub fn next(&mut self, index: usize, delta: Option<Delta>) -> Result<i64> {
        if index == 0 {
            return Ok(self.start);
        }
        match &mut self.mode {
            Mode::Spread { start, end, count } => {
                if *count <= 1 {
                    return Ok(*start);
                }
                let span = i128::from(*end) - i128::from(*start);
                let step = span * index as i128 / (*count as i128 - 1);
                Ok((i128::from(*start) + step) as i64)
            }
            Mode::Chained(clock) => {
                if let Some(delta) = delta {
                    delta.checked_value()?;
                }
                Ok(clock.advance(delta))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::proto::NARROW_MAX;

    #[derive(Debug, Clone, Default)]
    struct Slot(Option<Delta>);

    impl DeltaRecord for Slot {
        fn delta(&self) -> Option<Delta> {
            self.0
        }

        fn set_delta(&mut self, delta: Option<Delta>) {
            self.0 = delta;
        }
    }

    fn encode_all(timestamps: &[i64], tolerance: i32) -> Vec<Slot> {
        let mut encoder = TimestampEncoder::new(tolerance);
        let mut slots = Vec::new();
        for (i, &t) in timestamps.iter().enumerate() {
            let delta = if i + 1 < timestamps.len() {
                encoder.encode(t)
            } else {
                encoder.finish(t, &mut slots)
            };
            slots.push(Slot(delta));
        }
        slots
    }

    fn decode_all(slots: &[Slot], start: i64, end: i64, tolerance: i32) -> Vec<i64> {
        let mut decoder = TimestampDecoder::new(start, end, tolerance, slots.len());
        slots
            .iter()
            .enumerate()
            .map(|(i, s)| decoder.next(i, s.0).unwrap())
            .collect()
    }

    fn roundtrip(timestamps: &[i64], tolerance: i32) -> (Vec<Slot>, Vec<i64>) {
        let slots = encode_all(timestamps, tolerance);
        let decoded = decode_all(
            &slots,
            timestamps[0],
            *timestamps.last().unwrap(),
            tolerance,
        );
        (slots, decoded)
    }

    #[test]
    fn test_uniform_cadence_is_implicit() {
        let ts = [1000, 1010, 1020, 1030, 1040];
        let (slots, decoded) = roundtrip(&ts, 10);

        assert_eq!(slots.len(), 5);
        assert!(slots[0].0.is_none());
        assert!(slots[1..4].iter().all(|s| s.0.is_none()));
        assert_eq!(slots[4].0, Some(Delta::Small(10)));
        assert_eq!(decoded, ts);
    }

    #[test]
    fn test_drift_realigned_at_end() {
        let ts = [0, 9, 19, 28, 41];
        let (slots, decoded) = roundtrip(&ts, 10);

        // nominal reconstruction of the implicit run ends at 30
        assert_eq!(simulate(0, 10, &slots[..4]), 30);
        assert_eq!(slots[4].0, Some(Delta::Small(11)));
        assert_eq!(decoded[4], 41);
        for (d, t) in decoded.iter().zip(ts.iter()) {
            assert!((d - t).abs() <= 10);
        }
    }

    #[test]
    fn test_end_overshoot_is_redistributed() {
        // samples arrive slightly early, so the implicit run overshoots 498
        let ts = [0, 100, 200, 299, 398, 497, 498];
        let (slots, decoded) = roundtrip(&ts, 10);

        assert_eq!(slots[1].0, Some(Delta::Small(98)));
        assert!(slots[2..6].iter().all(|s| s.0.is_none()));
        assert_eq!(slots[6].0, Some(Delta::BaseSmall(8)));
        assert_eq!(decoded, vec![0, 98, 196, 294, 392, 490, 498]);
    }

    #[test]
    fn test_overshoot_inside_implicit_run_falls_back_to_exact() {
        // the only drifting record is implicit, nothing can be taken back
        let ts = [0, 1, 2];
        let (slots, decoded) = roundtrip(&ts, 10);

        assert_eq!(slots[1].0, Some(Delta::Small(1)));
        assert_eq!(slots[2].0, Some(Delta::Small(1)));
        assert_eq!(decoded, ts);
    }

    #[test]
    fn test_exact_deltas_when_tolerance_zero() {
        let ts = [5, 15, 25, 40, 41, 100];
        let (slots, decoded) = roundtrip(&ts, 0);
        assert!(slots[1..].iter().all(|s| s.0.is_some()));
        assert_eq!(decoded, ts);
    }

    #[test]
    fn test_single_sample() {
        let (slots, decoded) = roundtrip(&[777], 10);
        assert_eq!(slots.len(), 1);
        assert!(slots[0].0.is_none());
        assert_eq!(decoded, vec![777]);
    }

    #[test]
    fn test_disabled_layer_spreads_points() {
        let ts = [0, 3, 50, 60, 100];
        let (slots, decoded) = roundtrip(&ts, -1);
        assert!(slots.iter().all(|s| s.0.is_none()));
        assert_eq!(decoded, vec![0, 25, 50, 75, 100]);
    }

    #[test]
    fn test_narrow_wide_boundary() {
        let big = NARROW_MAX;
        let ts = [0, big, big + big + 1];
        let (slots, decoded) = roundtrip(&ts, 0);
        assert_eq!(slots[1].0, Some(Delta::Small(i32::MAX as u32)));
        assert_eq!(slots[2].0, Some(Delta::Large(NARROW_MAX + 1)));
        assert_eq!(decoded, ts);
    }

    #[test]
    fn test_base_point_resets_running_offset() {
        let slots = vec![
            Slot(None),
            Slot(Some(Delta::normal(100))),
            Slot(Some(Delta::base(95))),
            Slot(None),
        ];
        // after the base point the running offset is ε = 10
        assert_eq!(decode_all(&slots, 0, 0, 10), vec![0, 100, 195, 205]);
    }

    #[test]
    fn test_encoder_predicts_with_tolerance_after_base_point() {
        // a cadence change after an implicit run yields a base point; the
        // next sample repeats its offset but must stay explicit because the
        // decoder would advance by ε = 10 only
        let ts = [0, 100, 200, 350, 500, 650];
        let (slots, decoded) = roundtrip(&ts, 10);

        assert!(slots[2].0.is_none());
        assert_eq!(slots[3].0, Some(Delta::BaseSmall(150)));
        assert_eq!(slots[4].0, Some(Delta::Small(150)));
        assert_eq!(decoded, ts);
    }

    #[test]
    fn test_decoder_rejects_wide_small() {
        let mut decoder = TimestampDecoder::new(0, 0, 10, 2);
        decoder.next(0, None).unwrap();
        assert!(decoder.next(1, Some(Delta::Small(u32::MAX))).is_err());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let ts = [0, 9, 19, 28, 41, 52, 60, 500, 510, 520];
        let a = encode_all(&ts, 10);
        let b = encode_all(&ts, 10);
        let a: Vec<_> = a.into_iter().map(|s| s.0).collect();
        let b: Vec<_> = b.into_iter().map(|s| s.0).collect();
        assert_eq!(a, b);
    }
}
