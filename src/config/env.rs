use std::env;
use std::path::PathBuf;

use super::ServerConfig;
use super::merge::merge_config;

/// Variable naming an alternative `.env` file
const ENV_FILE_VAR: &str = "AUDIOMESH_ENV";

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file first (the one named by `AUDIOMESH_ENV`, else
    /// `./.env`). Values already present in the environment are never
    /// overridden by the file.
    ///
    /// Recognized variables:
    /// - `HOST` (default `0.0.0.0`)
    /// - `AUDIOMESH_PORT` (default `8080`; digits only, non-zero)
    /// - `GEMINI_API_KEY` (optional; blank or placeholder means unset)
    /// - `GEMINI_MODEL` (default Gemini Live native-audio model)
    /// - `VOXLATTICE_CONFIG_DIR` (default `.`; directory of `Voices.json`)
    ///
    /// # Errors
    /// Returns an error if `AUDIOMESH_PORT` is malformed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        match env::var(ENV_FILE_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                if let Err(e) = dotenvy::from_path(PathBuf::from(path.trim())) {
                    tracing::debug!("No env file loaded from {}: {}", path.trim(), e);
                }
            }
            _ => {
                let _ = dotenvy::dotenv();
            }
        }

        merge_config(None)
    }
}
