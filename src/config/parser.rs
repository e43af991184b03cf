use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

use super::models::BlockPulseConfig;

/// Errors that can occur during configuration parsing
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Other(String),
}

/// Provides default configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".blockpulse").join("config.yaml"))
}

/// Loads and validates the blockpulse configuration
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<BlockPulseConfig, ConfigError> {
    // Open the configuration file
    let mut file = File::open(&config_path).map_err(ConfigError::FileError)?;

    // Read the file content
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(ConfigError::FileError)?;

    parse_config(&content)
}

/// Parses and validates configuration from YAML text
pub fn parse_config(content: &str) -> Result<BlockPulseConfig, ConfigError> {
    // An empty document means "all defaults"
    let config: BlockPulseConfig = if content.trim().is_empty() {
        BlockPulseConfig::default()
    } else {
        serde_yaml::from_str(content).map_err(ConfigError::ParseError)?
    };

    config.validate().map_err(ConfigError::ValidationError)?;

    config
        .token
        .parsed_address()
        .map_err(ConfigError::Other)?;

    Ok(config)
}

/// Resolves which configuration to use
///
/// An explicit path must exist. Without one, the default path is used when
/// present, otherwise the built-in defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<BlockPulseConfig, ConfigError> {
    if let Some(path) = explicit {
        info!("Using configuration file: {:?}", path);
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Using configuration file: {:?}", path);
            load_config(&path)
        }
        _ => {
            info!("No configuration file found, using built-in defaults");
            Ok(BlockPulseConfig::default())
        }
    }
}

/// Reads the provider API key from the environment variable named in the config
///
/// Returns `None` when the variable is unset or empty; the provider then fails
/// its calls instead of the process failing at startup.
pub fn load_api_key(config: &BlockPulseConfig) -> Option<SecretString> {
    let env_var = &config.provider.api_key_env;
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => {
            debug!("Loaded API key from {}", env_var);
            Some(SecretString::from(key.trim().to_string()))
        }
        _ => None,
    }
}
