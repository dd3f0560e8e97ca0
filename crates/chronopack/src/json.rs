//! JSON fallback payload: `[[t0, t1, ...], [v0, v1, ...]]`.

use crate::codec::range::QueryRange;
use crate::error::{CodecError, Result};
use crate::series::list::LongList;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes parallel timestamps and values as the two-array JSON form.
///
/// # Errors
///
/// Returns `CodecError::InvalidArgument` if the slices differ in length.
pub fn to_json<V: Serialize>(timestamps: &[i64], values: &[V]) -> Result<Vec<u8>> {
    if timestamps.len() != values.len() {
        return Err(CodecError::InvalidArgument(format!(
            "{} timestamps but {} values",
            timestamps.len(),
            values.len()
        )));
    }
    Ok(serde_json::to_vec(&(timestamps, values))?)
}

/// Parses the two-array JSON form, keeping points inside `range`.
///
/// Timestamps are expected in ascending order: the scan stops at the first
/// timestamp past the end of the window.
///
/// # Errors
///
/// Returns `CodecError::Json` for malformed JSON and
/// `CodecError::CorruptPayload` if the arrays differ in length.
pub fn from_json<V: DeserializeOwned>(bytes: &[u8], range: &QueryRange) -> Result<(LongList, Vec<V>)> {
    let (all_timestamps, all_values): (Vec<i64>, Vec<V>) = serde_json::from_slice(bytes)?;
    if all_timestamps.len() != all_values.len() {
        return Err(CodecError::CorruptPayload(format!(
            "JSON payload has {} timestamps but {} values",
            all_timestamps.len(),
            all_values.len()
        )));
    }

    let mut timestamps = LongList::new();
    let mut values = Vec::new();
    for (t, v) in all_timestamps.into_iter().zip(all_values) {
        if t > range.to() {
            break;
        }
        if range.contains(t) {
            timestamps.push(t);
            values.push(v);
        }
    }
    Ok((timestamps, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let bytes = to_json(&[1000, 2000], &[1.5, 2.5]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[[1000,2000],[1.5,2.5]]");
    }

    #[test]
    fn test_filter_and_stop() {
        let bytes = br#"[[1000,2000,3000,4000],[1.0,2.0,3.0,4.0]]"#;
        let range = QueryRange::new(1500, 3000).unwrap();
        let (t, v) = from_json::<f64>(bytes, &range).unwrap();
        assert_eq!(t.as_slice(), &[2000, 3000]);
        assert_eq!(v, vec![2.0, 3.0]);
    }

    #[test]
    fn test_stops_at_first_timestamp_past_window() {
        // 1500 is inside the window but comes after 4000
        let bytes = br#"[[1000,4000,1500],[1,2,3]]"#;
        let range = QueryRange::new(0, 2000).unwrap();
        let (t, _) = from_json::<f64>(bytes, &range).unwrap();
        assert_eq!(t.as_slice(), &[1000]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = from_json::<f64>(b"[[1,2],[1.0]]", &QueryRange::unbounded()).unwrap_err();
        assert!(matches!(err, CodecError::CorruptPayload(_)));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            from_json::<f64>(b"{\"not\":\"arrays\"}", &QueryRange::unbounded()),
            Err(CodecError::Json(_))
        ));
    }
}
