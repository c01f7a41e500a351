//! Server configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable selecting the model version to serve
pub const MODEL_VERSION_ENV: &str = "MODEL_VERSION";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    /// Artifact version directory to load at startup
    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Root directory holding one sub-directory per version
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// API server port for health/predict/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_model_version() -> String {
    "v0.1".to_string()
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_api_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_version: default_model_version(),
            model_dir: default_model_dir(),
            api_port: default_api_port(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `TRIAGE_*` variables; `MODEL_VERSION`
    /// overrides `TRIAGE_MODEL_VERSION` when both are set.
    ///
    /// Values stay strings until deserialized, so a version such as `1.10`
    /// is never read back as the number `1.1`.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("TRIAGE"))
            .set_override_option("model_version", std::env::var(MODEL_VERSION_ENV).ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Location of the model artifact for the configured version
    pub fn model_path(&self) -> PathBuf {
        triage_lib::ArtifactPaths::for_version(&self.model_dir, &self.model_version).model
    }
}
