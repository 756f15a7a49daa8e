use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub const ENV_HOST: &str = "REGISTRE_HOST";
pub const ENV_PORT: &str = "REGISTRE_PORT";
pub const ENV_DATABASE_PATH: &str = "REGISTRE_DATABASE_PATH";
pub const ENV_LOG: &str = "REGISTRE_LOG";

const SUPPORTED_VERSION: &str = "1.0";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the file when one is given, otherwise starts from defaults, then
/// applies the `REGISTRE_*` environment overrides.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_env_overrides(config)
}

pub fn apply_env_overrides(config: Config) -> Result<Config, ConfigError> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Applies overrides looked up by variable name. Blank values are ignored.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = get(ENV_HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(ENV_PORT) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port.clone(),
            })?;
    }
    if let Some(path) = get(ENV_DATABASE_PATH) {
        config.database.path = Some(path);
    }
    if let Some(filter) = get(ENV_LOG) {
        config.logging.filter = filter;
    }

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    if let Some(path) = &config.database.path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "database.path must not be empty".to_string(),
            });
        }
    }

    for origin in &config.cors.allowed_origins {
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ConfigError::Validation {
                message: format!("Invalid CORS origin: {}", origin),
            });
        }
    }

    Ok(())
}
