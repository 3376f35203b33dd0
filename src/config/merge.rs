use std::env;
use std::path::PathBuf;

use super::ServerConfig;
use super::utils::non_blank;
use super::validation::{DEFAULT_PORT, parse_port, validate_port};
use super::yaml::YamlConfig;
use crate::auth::usable_api_key;
use crate::core::tts::gemini::DEFAULT_MODEL;

/// Merge YAML configuration with environment variables
///
/// Priority: YAML > ENV > Default. Blank values count as unset at every level.
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            non_blank($yaml_value).or_else(|| non_blank(env::var($env_var).ok()))
        };
    }

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            get_optional!($env_var, $yaml_value).unwrap_or_else(|| $default.to_string())
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        "0.0.0.0"
    );

    let port = if let Some(yaml_port) = yaml.server.as_ref().and_then(|s| s.port) {
        validate_port(yaml_port)?
    } else if let Some(port_str) = non_blank(env::var("AUDIOMESH_PORT").ok()) {
        parse_port(&port_str).map_err(|e| format!("AUDIOMESH_PORT: {e}"))?
    } else {
        DEFAULT_PORT
    };

    // Gemini configuration
    let gemini_api_key = get_optional!(
        "GEMINI_API_KEY",
        yaml.gemini.as_ref().and_then(|g| g.api_key.clone())
    )
    .and_then(|key| usable_api_key(&key).map(str::to_string));

    let gemini_model = get_value!(
        "GEMINI_MODEL",
        yaml.gemini.as_ref().and_then(|g| g.model.clone()),
        DEFAULT_MODEL
    );

    // Voice catalog location
    let config_dir = PathBuf::from(get_value!(
        "VOXLATTICE_CONFIG_DIR",
        yaml.voices.as_ref().and_then(|v| v.config_dir.clone()),
        "."
    ));

    Ok(ServerConfig {
        host,
        port,
        gemini_api_key,
        gemini_model,
        config_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::yaml::{GeminiYaml, ServerYaml, VoicesYaml};
    use serial_test::serial;

    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("AUDIOMESH_PORT");
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("GEMINI_MODEL");
            env::remove_var("VOXLATTICE_CONFIG_DIR");
        }
    }

    #[test]
    #[serial]
    fn test_merge_defaults_only() {
        cleanup_env_vars();
        let config = merge_config(None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.config_dir, PathBuf::from("."));
    }

    #[test]
    #[serial]
    fn test_merge_yaml_over_env() {
        cleanup_env_vars();
        unsafe {
            env::set_var("HOST", "10.0.0.1");
            env::set_var("AUDIOMESH_PORT", "7000");
            env::set_var("GEMINI_API_KEY", "env-key");
            env::set_var("VOXLATTICE_CONFIG_DIR", "/env/dir");
        }

        let yaml = YamlConfig {
            server: Some(ServerYaml {
                host: Some("127.0.0.1".to_string()),
                port: Some(9000),
            }),
            gemini: Some(GeminiYaml {
                api_key: Some("yaml-key".to_string()),
                model: None,
            }),
            voices: Some(VoicesYaml { config_dir: None }),
        };

        let config = merge_config(Some(yaml)).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.gemini_api_key.as_deref(), Some("yaml-key"));
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.config_dir, PathBuf::from("/env/dir"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_blank_yaml_falls_back_to_env() {
        cleanup_env_vars();
        unsafe {
            env::set_var("GEMINI_MODEL", "models/env");
        }

        let yaml = YamlConfig {
            gemini: Some(GeminiYaml {
                api_key: Some("  ".to_string()),
                model: Some("".to_string()),
            }),
            ..Default::default()
        };

        let config = merge_config(Some(yaml)).unwrap();
        assert_eq!(config.gemini_model, "models/env");
        assert_eq!(config.gemini_api_key, None);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_placeholder_key_from_yaml() {
        cleanup_env_vars();
        let yaml = YamlConfig {
            gemini: Some(GeminiYaml {
                api_key: Some("your_api_key_here".to_string()),
                model: None,
            }),
            ..Default::default()
        };

        let config = merge_config(Some(yaml)).unwrap();
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    #[serial]
    fn test_merge_invalid_env_port() {
        cleanup_env_vars();
        unsafe {
            env::set_var("AUDIOMESH_PORT", "http");
        }

        let err = merge_config(None).unwrap_err();
        assert!(err.to_string().starts_with("AUDIOMESH_PORT: invalid port"));

        cleanup_env_vars();
    }
}
