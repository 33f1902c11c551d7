//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The contract account-name file is missing or empty.
    #[error("Cannot read contract account from {path}: {reason}")]
    AccountFile { path: PathBuf, reason: String },

    /// Signer credentials are missing or malformed.
    #[error("Credentials error: {0}")]
    Credentials(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read the deployed contract's account id from its account-name file.
///
/// Relative paths are resolved against `base_dir`.
pub fn read_account_id(base_dir: &Path, account_file: &Path) -> Result<String, ConfigError> {
    let path = if account_file.is_absolute() {
        account_file.to_path_buf()
    } else {
        base_dir.join(account_file)
    };

    let content = fs::read_to_string(&path).map_err(|e| ConfigError::AccountFile {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let account_id = content.trim();
    if account_id.is_empty() {
        return Err(ConfigError::AccountFile {
            path,
            reason: "file is empty".to_string(),
        });
    }

    Ok(account_id.to_string())
}
