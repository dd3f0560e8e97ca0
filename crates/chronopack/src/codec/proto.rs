//! Wire messages for the points envelope.
//!
//! ```text
//! message PointRecord {
//!   oneof t     { uint32 t_small = 1; int64 t_large = 2;
//!                 uint32 tb_small = 3; int64 tb_large = 4; }
//!   oneof value { double v = 5; uint32 v_index = 6; }
//! }
//! message Points { repeated PointRecord p = 1; int32 ddc = 2; }
//! ```
//!
//! The structured variants (`StraceRecord`, `LsofRecord`) share the `t`
//! oneof and tags 1-4, and carry their payload in-line from tag 5 on.

use crate::error::{CodecError, Result};
use prost::{Message, Oneof};

/// Largest delta stored in the narrow (31-bit) form.
pub const NARROW_MAX: i64 = i32::MAX as i64;

/// Timestamp delta carried by a record.
///
/// `Small`/`Large` are normal deltas; `BaseSmall`/`BaseLarge` are base-point
/// deltas that reset the decoder's running offset after they are applied.
#[derive(Clone, Copy, PartialEq, Eq, Oneof)]
pub enum Delta {
    /// Normal delta in `[0, 2^31 - 1]`.
    #[prost(uint32, tag = "1")]
    Small(u32),
    /// Normal delta outside the narrow range.
    #[prost(int64, tag = "2")]
    Large(i64),
    /// Base-point delta in `[0, 2^31 - 1]`.
    #[prost(uint32, tag = "3")]
    BaseSmall(u32),
    /// Base-point delta outside the narrow range.
    #[prost(int64, tag = "4")]
    BaseLarge(i64),
}

impl Delta {
    /// Normal delta, narrow when `value` fits in 31 bits.
    pub fn normal(value: i64) -> Self {
        match narrow(value) {
            Some(small) => Delta::Small(small),
            None => Delta::Large(value),
        }
    }

    /// Base-point delta, narrow when `value` fits in 31 bits.
    pub fn base(value: i64) -> Self {
        match narrow(value) {
            Some(small) => Delta::BaseSmall(small),
            None => Delta::BaseLarge(value),
        }
    }

    /// The delta in milliseconds.
    pub fn value(self) -> i64 {
        match self {
            Delta::Small(v) | Delta::BaseSmall(v) => i64::from(v),
            Delta::Large(v) | Delta::BaseLarge(v) => v,
        }
    }

    /// Returns true for base-point deltas.
    pub fn is_base(self) -> bool {
        matches!(self, Delta::BaseSmall(_) | Delta::BaseLarge(_))
    }

    /// Returns true when stored in the narrow form.
    pub fn is_narrow(self) -> bool {
        matches!(self, Delta::Small(_) | Delta::BaseSmall(_))
    }

    /// Same kind (normal/base) with a new value; the width is re-chosen.
    pub fn with_value(self, value: i64) -> Self {
        if self.is_base() {
            Delta::base(value)
        } else {
            Delta::normal(value)
        }
    }

    /// The delta, rejecting narrow values that use the 32nd bit.
    pub(crate) fn checked_value(self) -> Result<i64> {
        match self {
            Delta::Small(v) | Delta::BaseSmall(v) if i64::from(v) > NARROW_MAX => Err(
                CodecError::CorruptPayload(format!("narrow delta {v} exceeds 31 bits")),
            ),
            other => Ok(other.value()),
        }
    }
}

fn narrow(value: i64) -> Option<u32> {
    if (0..=NARROW_MAX).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

/// Numeric value carried by a [`PointRecord`].
#[derive(Clone, Copy, PartialEq, Oneof)]
pub enum PointValue {
    /// The value itself.
    #[prost(double, tag = "5")]
    V(f64),
    /// Index of an earlier record whose `v` holds this value.
    #[prost(uint32, tag = "6")]
    VIndex(u32),
}

/// One stored numeric sample.
#[derive(Clone, PartialEq, Message)]
pub struct PointRecord {
    /// Timestamp delta; absent for implicit records.
    #[prost(oneof = "Delta", tags = "1, 2, 3, 4")]
    pub t: Option<Delta>,
    /// Value or back-reference.
    #[prost(oneof = "PointValue", tags = "5, 6")]
    pub value: Option<PointValue>,
}

/// Envelope of numeric records plus the tolerance used to encode them.
#[derive(Clone, PartialEq, Message)]
pub struct Points {
    /// Records in sample order.
    #[prost(message, repeated, tag = "1")]
    pub p: Vec<PointRecord>,
    /// Tolerance (ms) used at encode time.
    #[prost(int32, tag = "2")]
    pub ddc: i32,
}

/// One stored system call sample.
#[derive(Clone, PartialEq, Message)]
pub struct StraceRecord {
    /// Timestamp delta; absent for implicit records.
    #[prost(oneof = "Delta", tags = "1, 2, 3, 4")]
    pub t: Option<Delta>,
    /// Calling process.
    #[prost(int32, tag = "5")]
    pub pid: i32,
    /// The call text.
    #[prost(string, tag = "6")]
    pub call: String,
}

/// Envelope of system call records.
#[derive(Clone, PartialEq, Message)]
pub struct StracePoints {
    /// Records in sample order.
    #[prost(message, repeated, tag = "1")]
    pub p: Vec<StraceRecord>,
    /// Tolerance (ms) used at encode time.
    #[prost(int32, tag = "2")]
    pub ddc: i32,
}

/// One row of an open-files snapshot.
#[derive(Clone, PartialEq, Message)]
pub struct LsofEntry {
    /// Command name.
    #[prost(string, tag = "1")]
    pub command: String,
    /// Owning process.
    #[prost(int32, tag = "2")]
    pub pid: i32,
    /// Owning user.
    #[prost(string, tag = "3")]
    pub user: String,
    /// File descriptor column.
    #[prost(string, tag = "4")]
    pub fd: String,
    /// File type column.
    #[prost(string, tag = "5")]
    pub r#type: String,
    /// Device numbers.
    #[prost(string, tag = "6")]
    pub device: String,
    /// Size or offset column.
    #[prost(string, tag = "7")]
    pub size: String,
    /// Inode number.
    #[prost(string, tag = "8")]
    pub node: String,
    /// File name.
    #[prost(string, tag = "9")]
    pub name: String,
}

/// One stored open-files snapshot.
#[derive(Clone, PartialEq, Message)]
pub struct LsofRecord {
    /// Timestamp delta; absent for implicit records.
    #[prost(oneof = "Delta", tags = "1, 2, 3, 4")]
    pub t: Option<Delta>,
    /// Snapshot rows.
    #[prost(message, repeated, tag = "5")]
    pub p: Vec<LsofEntry>,
}

/// Envelope of open-files snapshot records.
#[derive(Clone, PartialEq, Message)]
pub struct LsofPoints {
    /// Records in sample order.
    #[prost(message, repeated, tag = "1")]
    pub p: Vec<LsofRecord>,
    /// Tolerance (ms) used at encode time.
    #[prost(int32, tag = "2")]
    pub ddc: i32,
}

/// A wire record that can carry a timestamp delta.
pub trait DeltaRecord {
    /// The stored delta, if any.
    fn delta(&self) -> Option<Delta>;

    /// Replaces the stored delta.
    fn set_delta(&mut self, delta: Option<Delta>);
}

/// An envelope: ordered records plus the stored tolerance.
pub trait Envelope: Message + Default + Sized {
    /// Record type held by the envelope.
    type Record: DeltaRecord + Message + Default + Clone;

    /// Builds an envelope.
    fn from_records(records: Vec<Self::Record>, ddc: i32) -> Self;

    /// The records in sample order.
    fn records(&self) -> &[Self::Record];

    /// The stored tolerance.
    fn ddc(&self) -> i32;

    /// Serializes the envelope (before gzip).
    fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Parses an envelope from inflated bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::decode(bytes)?)
    }
}

macro_rules! wire_envelope {
    ($envelope:ty, $record:ty) => {
        impl DeltaRecord for $record {
            fn delta(&self) -> Option<Delta> {
                self.t
            }

            fn set_delta(&mut self, delta: Option<Delta>) {
                self.t = delta;
            }
        }

        impl Envelope for $envelope {
            type Record = $record;

            fn from_records(records: Vec<$record>, ddc: i32) -> Self {
                Self { p: records, ddc }
            }

            fn records(&self) -> &[$record] {
                &self.p
            }

            fn ddc(&self) -> i32 {
                self.ddc
            }
        }
    };
}

wire_envelope!(Points, PointRecord);
wire_envelope!(StracePoints, StraceRecord);
wire_envelope!(LsofPoints, LsofRecord);
