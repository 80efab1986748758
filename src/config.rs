//! Configuration management for the schema downloader
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas.toml)
//! - Environment variables (SCHEMAS__*)
//!
//! ## Example config file (schemas.toml):
//! ```toml
//! [registry]
//! project = "my-gcp-project"
//! endpoint = "https://pubsub.googleapis.com/v1"
//! timeout_secs = 30
//!
//! [download]
//! output_directory = "target/schemas"
//! schema_type = "AVRO"
//! patterns = ["orders-.*", "users"]
//! versions = ["f81ba5ff", "a4c2e001"]
//! skip = false
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::DEFAULT_ENDPOINT;
use crate::error::Result;

/// Main configuration for the downloader
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Download settings
    #[serde(default)]
    pub download: DownloadSettings,
}

/// Remote registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Project that owns the schemas
    #[serde(default)]
    pub project: String,

    /// REST endpoint of the schema service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// OAuth2 access token sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// What to download and where to put it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Output root; files land in `{output_directory}/{project}/`
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Project id (filled from `registry.project` when empty)
    #[serde(default)]
    pub project: String,

    /// Only download this type (AVRO or PROTOCOL_BUFFER); unset means both
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Schema name patterns; empty downloads everything
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Revision per pattern, paired by position
    #[serde(default)]
    pub versions: Vec<String>,

    /// Do nothing
    #[serde(default)]
    pub skip: bool,
}

// Default value functions
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("target/schemas")
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            endpoint: default_endpoint(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            project: String::new(),
            schema_type: None,
            patterns: Vec::new(),
            versions: Vec::new(),
            skip: false,
        }
    }
}

impl DownloadConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "schemas.toml",
            ".schemas.toml",
            "config/schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "pubsub", "schemas") {
            let xdg_config = config_dir.config_dir().join("schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (SCHEMAS__*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("download.patterns")
                .with_list_parse_key("download.versions"),
        );

        let config = builder.build()?;
        let mut loaded: Self = config.try_deserialize()?;
        loaded.resolve_project();
        Ok(loaded)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Use the registry project for downloads that name none
    pub fn resolve_project(&mut self) {
        if self.download.project.is_empty() {
            self.download.project = self.registry.project.clone();
        }
    }

    /// Get the output directory (resolves relative paths)
    pub fn output_path(&self) -> PathBuf {
        if self.download.output_directory.is_absolute() {
            self.download.output_directory.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.download.output_directory)
        }
    }
}
