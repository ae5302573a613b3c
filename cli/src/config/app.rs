use super::{
    LoggingConfig,
    limits::*,
    validation::{ConfigValidationError, is_hex_color},
};
use backdrop_core::ControllerSettings;
use backdrop_core::applier::TransitionTimings;
use backdrop_core::overlay::OverlaySettings;
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// Storage domain images are served from.
    domain: Option<String>,
    /// Site origin root-relative paths resolve against.
    origin: Option<String>,
    storage_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,

    #[serde(default)]
    transition: TransitionTimings,
    #[serde(default)]
    overlay: OverlaySettings,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    /// Validate the configuration, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let timeout = self.request_timeout_secs();
        if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::RequestTimeout {
                configured: timeout,
                min_limit: MIN_REQUEST_TIMEOUT_SECS,
                max_limit: MAX_REQUEST_TIMEOUT_SECS,
            });
        }

        if let Some(origin) = self.origin.as_deref() {
            if let Err(reason) = parse_origin(origin) {
                errors.push(ConfigValidationError::Origin {
                    configured: origin.to_string(),
                    reason,
                });
            }
        }

        if let Err(e) = self.transition.validate() {
            errors.push(e.into());
        }

        if self.overlay.fade_ms > MAX_OVERLAY_FADE_MS {
            errors.push(ConfigValidationError::OverlayFade {
                configured: self.overlay.fade_ms,
                limit: MAX_OVERLAY_FADE_MS,
            });
        }

        for (key, color) in [
            ("light_color", &self.overlay.light_color),
            ("dark_color", &self.overlay.dark_color),
        ] {
            if !is_hex_color(color) {
                errors.push(ConfigValidationError::OverlayColor {
                    key,
                    configured: color.clone(),
                });
            }
        }

        let level = self.logging.level().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or("")
    }

    /// Parsed site origin. `None` when unset or invalid; `validate` reports
    /// the latter.
    pub fn origin(&self) -> Option<Url> {
        self.origin
            .as_deref()
            .and_then(|origin| parse_origin(origin).ok())
    }

    /// Where selections are persisted: the configured path, or
    /// `<data dir>/backdrop/selections.json`.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            dirs::data_dir().map(|mut path| {
                path.push("backdrop");
                path.push("selections.json");
                path
            })
        })
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs())
    }

    pub fn transition(&self) -> &TransitionTimings {
        &self.transition
    }

    pub fn overlay(&self) -> &OverlaySettings {
        &self.overlay
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Controller tunables derived from this configuration.
    pub fn controller_settings(&self, rng_seed: Option<u64>) -> ControllerSettings {
        ControllerSettings {
            domain: self.domain().to_string(),
            transition: self.transition,
            overlay: self.overlay.clone(),
            rng_seed,
        }
    }
}

fn parse_origin(origin: &str) -> Result<Url, String> {
    let url = Url::parse(origin).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_ok!(config.validate());
        assert_eq!(config.domain(), "");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.origin().is_none());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let config = AppConfig {
            origin: Some("ftp://example.com".to_string()),
            request_timeout_secs: Some(0),
            overlay: OverlaySettings {
                fade_ms: 10_000,
                light_color: "white".to_string(),
                ..OverlaySettings::default()
            },
            ..AppConfig::default()
        };

        let errors = assert_err!(config.validate());
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_controller_settings_carry_domain_and_seed() {
        let config = AppConfig {
            domain: Some("images.example.com".to_string()),
            ..AppConfig::default()
        };

        let settings = config.controller_settings(Some(7));
        assert_eq!(settings.domain, "images.example.com");
        assert_eq!(settings.rng_seed, Some(7));
        assert_eq!(settings.transition, TransitionTimings::default());
    }
}
