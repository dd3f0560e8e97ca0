//! Point streams over structured payloads.
//!
//! Structured values share the timestamp chain of the numeric stream but are
//! always stored in-line; there is no back-reference deduplication.

use crate::codec::proto::{
    Envelope, LsofEntry, LsofPoints, LsofRecord, StracePoints, StraceRecord,
};
use crate::codec::range::QueryRange;
use crate::codec::{decode_records, encode_records};
use crate::error::Result;
use crate::series::list::LongList;
use crate::series::payload::{Lsof, Strace};
use crate::series::point::Point;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A sample value with its own wire record type.
///
/// The serde bounds back the JSON fallback path of the converters.
pub trait StructuredValue: Clone + Serialize + DeserializeOwned {
    /// Envelope holding records of this value.
    type Envelope: Envelope;

    /// Builds the record for this value (without a delta).
    fn to_record(&self) -> <Self::Envelope as Envelope>::Record;

    /// Reads the value back out of a record.
    fn from_record(record: &<Self::Envelope as Envelope>::Record) -> Self;
}

impl StructuredValue for Strace {
    type Envelope = StracePoints;

    fn to_record(&self) -> StraceRecord {
        StraceRecord {
            t: None,
            pid: self.pid,
            call: self.call.clone(),
        }
    }

    fn from_record(record: &StraceRecord) -> Self {
        Strace::new(record.pid, record.call.clone())
    }
}

impl StructuredValue for Vec<Lsof> {
    type Envelope = LsofPoints;

    fn to_record(&self) -> LsofRecord {
        LsofRecord {
            t: None,
            p: self.iter().map(LsofEntry::from).collect(),
        }
    }

    fn from_record(record: &LsofRecord) -> Self {
        record.p.iter().map(Lsof::from).collect()
    }
}

impl From<&Lsof> for LsofEntry {
    fn from(row: &Lsof) -> Self {
        LsofEntry {
            command: row.command.clone(),
            pid: row.pid,
            user: row.user.clone(),
            fd: row.fd.clone(),
            r#type: row.kind.clone(),
            device: row.device.clone(),
            size: row.size.clone(),
            node: row.node.clone(),
            name: row.name.clone(),
        }
    }
}

impl From<&LsofEntry> for Lsof {
    fn from(entry: &LsofEntry) -> Self {
        Lsof {
            command: entry.command.clone(),
            pid: entry.pid,
            user: entry.user.clone(),
            fd: entry.fd.clone(),
            kind: entry.r#type.clone(),
            device: entry.device.clone(),
            size: entry.size.clone(),
            node: entry.node.clone(),
            name: entry.name.clone(),
        }
    }
}

/// Encodes structured samples with tolerance `ε`. `None` entries are
/// skipped.
pub fn encode<V, I, P>(points: I, tolerance: i32) -> V::Envelope
where
    V: StructuredValue,
    I: IntoIterator<Item = P>,
    P: Into<Option<Point<V>>>,
{
    let records = encode_records(points, tolerance, |value: &V, _| value.to_record());
    V::Envelope::from_records(records, tolerance)
}

/// Decodes structured samples belonging to an outer record spanning
/// `[start, end]`, keeping the points inside `range`.
///
/// # Errors
///
/// Returns `CodecError::CorruptPayload` when a record carries an invalid
/// delta.
pub fn decode<V: StructuredValue>(
    envelope: &V::Envelope,
    start: i64,
    end: i64,
    range: &QueryRange,
) -> Result<(LongList, Vec<V>)> {
    let records = envelope.records();
    decode_records(records, envelope.ddc(), start, end, range, |i| {
        Ok(V::from_record(&records[i]))
    })
}
