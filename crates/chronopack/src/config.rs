//! Process-wide codec configuration.
//!
//! The only knob is the default timestamp tolerance (the "almost equals"
//! offset, stored on the wire as `ddc`). It is read once from the
//! `DATE_EQUALS_OFFSET_MS` environment variable and never changes afterwards.
//! Callers that pass a tolerance explicitly are not affected by it.

use once_cell::sync::Lazy;
use tracing::warn;

/// Environment variable holding the default tolerance in milliseconds.
pub const TOLERANCE_ENV: &str = "DATE_EQUALS_OFFSET_MS";

/// Default tolerance in milliseconds when nothing is configured.
pub const DEFAULT_TOLERANCE_MS: i32 = 10;

/// Tolerance value that disables the timestamp layer entirely.
pub const TIMESTAMPS_DISABLED: i32 = -1;

static DEFAULT_CONFIG: Lazy<CodecConfig> = Lazy::new(CodecConfig::from_env);

/// Configuration for encoding time series points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum per-step timestamp reconstruction error in milliseconds.
    ///
    /// `0` stores every delta explicitly, `-1` drops timestamps and keeps
    /// only values.
    pub tolerance: i32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_MS,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration with an explicit tolerance.
    pub fn new(tolerance: i32) -> Self {
        Self { tolerance }
    }

    /// Reads the configuration from the process environment.
    ///
    /// Falls back to [`DEFAULT_TOLERANCE_MS`] when the variable is missing or
    /// does not hold a tolerance of at least `-1`.
    pub fn from_env() -> Self {
        match std::env::var(TOLERANCE_ENV) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|| {
                warn!(
                    variable = TOLERANCE_ENV,
                    value = %raw,
                    "ignoring invalid tolerance, using default of {} ms",
                    DEFAULT_TOLERANCE_MS
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let tolerance = raw.trim().parse::<i32>().ok()?;
        (tolerance >= TIMESTAMPS_DISABLED).then_some(Self { tolerance })
    }
}

/// Returns the process-wide default tolerance.
///
/// The environment is consulted on the first call only.
pub fn default_tolerance() -> i32 {
    DEFAULT_CONFIG.tolerance
}
