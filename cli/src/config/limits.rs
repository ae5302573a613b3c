// Bounds for values read from backdrop.toml.

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Overlay fades longer than this read as a hang.
pub const MAX_OVERLAY_FADE_MS: u64 = 5_000;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
