//! Value back-references.
//!
//! A value seen before is stored as the index of the record that first
//! carried it. Keys are the IEEE-754 bit pattern, so `0.0` and `-0.0` are
//! distinct and every NaN is stored explicitly.

use crate::codec::proto::{PointRecord, PointValue};
use crate::error::{CodecError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Maps each distinct value to the first record index that stored it.
#[derive(Debug, Clone, Default)]
pub struct ValueIndex {
    first_seen: HashMap<u64, u32>,
}

impl ValueIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value field for the record at `index`.
    pub fn encode(&mut self, value: f64, index: usize) -> PointValue {
        if value.is_nan() {
            return PointValue::V(value);
        }
        let Ok(index) = u32::try_from(index) else {
            return PointValue::V(value);
        };
        match self.first_seen.entry(value.to_bits()) {
            Entry::Occupied(first) => PointValue::VIndex(*first.get()),
            Entry::Vacant(slot) => {
                slot.insert(index);
                PointValue::V(value)
            }
        }
    }

    /// Number of distinct values seen.
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    /// Returns true if no value has been indexed.
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

/// Resolves the value of `records[index]`, following a back-reference.
///
/// # Errors
///
/// Returns `CodecError::CorruptPayload` if the record has no value, or its
/// `v_index` does not point at an earlier record carrying a concrete `v`.
pub fn resolve(records: &[PointRecord], index: usize) -> Result<f64> {
    match records.get(index).and_then(|r| r.value) {
        Some(PointValue::V(v)) => Ok(v),
        Some(PointValue::VIndex(k)) => {
            let k = k as usize;
            match records.get(k).and_then(|r| r.value) {
                Some(PointValue::V(v)) if k < index => Ok(v),
                _ => Err(CodecError::CorruptPayload(format!(
                    "record {index} references record {k} which has no value"
                ))),
            }
        }
        None => Err(CodecError::CorruptPayload(format!(
            "record {index} carries no value"
        ))),
    }
}
