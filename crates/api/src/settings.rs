//! Service Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `navai-guard.{toml,yaml,json}` file, then `NAVAI__*` environment variables.

use config::{Config, ConfigError, Environment, File, Map};
use data_validator::ValidationConfig;
use inference_engine::{AssetPaths, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_FILE_ENV: &str = "NAVAI_CONFIG";

/// Errors while building settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Where the trained artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Install directory; artifact files are resolved beneath it
    pub base_path: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_path: install_dir(),
            model_file: "models/autoencoder_model.onnx".to_string(),
            scaler_file: "models/scaler.json".to_string(),
        }
    }
}

/// Classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Reconstruction error above which a record is anomalous
    pub threshold: f64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub assets: AssetSettings,
    pub detection: DetectionSettings,
    pub validation: ValidationConfig,
    pub logging: LoggingSettings,
    pub metrics: MetricsSettings,
}

impl Settings {
    /// Load from the default file locations and the process environment
    pub fn load() -> Result<Self, SettingsError> {
        let file = std::env::var(CONFIG_FILE_ENV).ok();
        Self::load_with(file.as_deref(), None)
    }

    /// Load with an explicit file and, for tests, an explicit environment map
    pub fn load_with(
        file: Option<&str>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        builder = match file {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder
                .add_source(File::with_name("navai-guard").required(false))
                .add_source(File::with_name("config/navai-guard").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("NAVAI")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let threshold = self.detection.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(SettingsError::Invalid {
                key: "detection.threshold",
                reason: format!("{} must be a finite, non-negative number", threshold),
            });
        }
        if self.server.port == 0 {
            return Err(SettingsError::Invalid {
                key: "server.port",
                reason: "port must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Listener address
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| SettingsError::Invalid {
                key: "server.host",
                reason: e.to_string(),
            })
    }

    /// Resolved artifact locations
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::resolve(
            &self.assets.base_path,
            &self.assets.model_file,
            &self.assets.scaler_file,
        )
    }
}

/// Directory holding the running binary, or the working directory
fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
