use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

pub mod app;
pub mod limits;
pub mod validation;

pub use app::AppConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

/// Name of the optional configuration file looked up in the working
/// directory.
pub const CONFIG_FILE_NAME: &str = "backdrop.toml";

/// Prefix of environment overrides, e.g. `BACKDROP__TRANSITION__TOTAL_MS`.
pub const ENV_PREFIX: &str = "BACKDROP";

/// Values passed on the command line; they win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub domain: Option<String>,
}

/// Loads and validates the configuration.
///
/// An explicit `path` must exist; otherwise `backdrop.toml` is read when
/// present. Environment variables override the file.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> ConfigLoadResult {
    dotenv::dotenv().ok();

    let config = match build(path, overrides) {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your {CONFIG_FILE_NAME} file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => {
            if let Err(validation_errors) = app_config.validate() {
                let error_messages: Vec<String> =
                    validation_errors.iter().map(|e| e.user_message()).collect();
                return ConfigLoadResult::DeserializeError(format!(
                    "Configuration validation failed:\n{}",
                    error_messages.join("\n\n")
                ));
            }
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

fn build(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let file_source = match path {
        Some(path) => File::from(path).format(FileFormat::Toml).required(true),
        None => File::new(CONFIG_FILE_NAME, FileFormat::Toml).required(false),
    };

    let env_source = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true);

    Config::builder()
        .add_source(file_source)
        .add_source(env_source)
        .set_override_option("domain", overrides.domain.clone())?
        .build()
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}
