//! Field names of the stored document.

/// Metric name.
pub const METRIC: &str = "metric";
/// Document identifier.
pub const ID: &str = "id";
/// First timestamp.
pub const START: &str = "start";
/// Last timestamp.
pub const END: &str = "end";
/// Gzip-compressed envelope.
pub const DATA: &str = "data";

/// Keys owned by the document itself.
pub const RESERVED: [&str; 5] = [METRIC, ID, START, END, DATA];

/// JSON fallback payload.
pub const DATA_AS_JSON: &str = "dataAsJson";
/// Scalar stored in place of a point stream.
pub const FUNCTION_VALUE: &str = "function_value";
/// Plain scalar field, read when `function_value` is absent.
pub const VALUE: &str = "value";

/// Scalar payload fields in lookup order.
pub const SCALAR_FIELDS: [&str; 2] = [FUNCTION_VALUE, VALUE];

/// Returns true for keys owned by the document.
pub fn is_reserved(key: &str) -> bool {
    RESERVED.contains(&key)
}

/// Returns true for keys that hold user attributes.
pub fn is_user_defined(key: &str) -> bool {
    !is_reserved(key)
}

/// Returns true for the alternative payload fields that are never copied
/// into attributes. `value` is only dropped when it was read as the scalar.
pub fn is_data_field(key: &str) -> bool {
    key == DATA_AS_JSON || key == FUNCTION_VALUE
}
