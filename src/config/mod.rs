//! Configuration module for the Voxlattice server
//!
//! Configuration comes from YAML files and environment variables. YAML values
//! take precedence over the environment, which takes precedence over defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Port and value validation
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use voxlattice::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable fallbacks
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use validation::DEFAULT_PORT;

use crate::core::voices::voices_file_path;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Gemini settings
    /// Key used when a request carries none; never the placeholder
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    /// Directory holding `Voices.json`
    pub config_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable fallbacks
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// # Errors
    /// Returns an error if the YAML file cannot be read or is malformed, or if
    /// the resulting port is invalid.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // No .env loading here: the YAML file is the source of truth and only
        // real environment variables fill its gaps.
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        merge::merge_config(Some(yaml_config))
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Gemini model used for every session
    pub fn model(&self) -> &str {
        &self.gemini_model
    }

    /// Server-side API key used when a request brings its own none
    pub fn fallback_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    /// Location of the voice catalog file
    pub fn voices_file(&self) -> PathBuf {
        voices_file_path(&self.config_dir)
    }
}
