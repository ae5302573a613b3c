use super::app::AppConfig;
use backdrop_core::applier::TimingsError;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid request_timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    RequestTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid origin '{configured}': {reason}")]
    Origin { configured: String, reason: String },
    #[error("Invalid transition timings: {0}")]
    Transition(#[from] TimingsError),
    #[error("Invalid overlay.fade_ms: {configured} (limit: {limit})")]
    OverlayFade { configured: u64, limit: u64 },
    #[error("Invalid overlay.{key}: '{configured}' is not a hex colour")]
    OverlayColor { key: &'static str, configured: String },
    #[error("Invalid logging.level: '{configured}'")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::RequestTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update request_timeout_secs in backdrop.toml."
                )
            }
            ConfigValidationError::Origin { configured, reason } => {
                format!(
                    "Origin is not a usable URL!\n\n\
                    Your configured value: {configured}\n\
                    Problem: {reason}\n\n\
                    Please set origin in backdrop.toml to an http(s) URL such as https://example.com."
                )
            }
            ConfigValidationError::Transition(e) => {
                format!(
                    "Transition timings are inconsistent!\n\n\
                    Problem: {e}\n\n\
                    Please update the [transition] section in backdrop.toml so that \
                    0 < swap_settle_ms < fade_in_gap_ms and swap_settle_ms + fade_in_gap_ms <= total_ms."
                )
            }
            ConfigValidationError::OverlayFade { configured, limit } => {
                format!(
                    "Overlay fade too long!\n\n\
                    Your configured value: {configured} ms\n\
                    Recommended maximum: {limit} ms\n\n\
                    Please update fade_ms in the [overlay] section of backdrop.toml."
                )
            }
            ConfigValidationError::OverlayColor { key, configured } => {
                format!(
                    "Overlay colour not recognised!\n\n\
                    Your configured value: {configured}\n\
                    Expected: #rgb, #rrggbb or #rrggbbaa\n\n\
                    Please update {key} in the [overlay] section of backdrop.toml."
                )
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\n\
                    Your configured value: {configured}\n\
                    Valid levels: trace, debug, info, warn, error\n\n\
                    Please update level in the [logging] section of backdrop.toml."
                )
            }
        }
    }
}

/// Configuration loading result
#[derive(Debug)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

impl ConfigLoadResult {
    /// Unwraps a successful load, turning failures into their message.
    pub fn into_result(self) -> Result<AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => Err(msg),
        }
    }
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
