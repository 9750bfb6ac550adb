//! TOML-based configuration for hashfn.
//!
//! Supports a config file (hashfn.toml) with environment variable expansion
//! in string values.
//!
//! Example configuration:
//! ```toml
//! [functions]
//! enabled = ["md5", "sha1", "sha256"]
//!
//! [execution]
//! lanes = 4
//! min_rows_per_lane = 1024
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::digest::DigestAlgorithm;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Which hashing functions are registered.
    pub functions: FunctionSettings,

    /// Row evaluation settings.
    pub execution: ExecutionSettings,
}

/// Function registration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FunctionSettings {
    /// Enabled digest algorithms.
    pub enabled: Vec<DigestAlgorithm>,
}

impl Default for FunctionSettings {
    fn default() -> Self {
        Self {
            enabled: DigestAlgorithm::ALL.to_vec(),
        }
    }
}

/// Row evaluation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Number of execution lanes. `0` means one per rayon worker thread.
    pub lanes: usize,

    /// Below this many rows per lane, evaluation stays on one lane.
    pub min_rows_per_lane: usize,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            lanes: 0,
            min_rows_per_lane: 1024,
        }
    }
}

impl ExecutionSettings {
    /// Lane count with `0` resolved against the rayon pool.
    pub fn resolved_lanes(&self) -> usize {
        if self.lanes == 0 {
            rayon::current_num_threads().max(1)
        } else {
            self.lanes
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    ///
    /// `${VAR}` references are expanded inside string values after parsing.
    /// Comments, keys and non-string values are never expanded.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut value = toml::Value::Table(table);
        expand_string_values(&mut value)?;
        let settings = value.try_into::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `HASHFN_CONFIG`
    /// 2. `./hashfn.toml`
    /// 3. `~/.config/hashfn/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("HASHFN_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("hashfn.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("hashfn").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.functions.enabled.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "functions.enabled must list at least one algorithm".to_string(),
            ));
        }
        if self.execution.min_rows_per_lane == 0 {
            return Err(SettingsError::InvalidConfig(
                "execution.min_rows_per_lane must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn expand_string_values(value: &mut toml::Value) -> Result<(), SettingsError> {
    match value {
        toml::Value::String(s) => *s = expand_env_vars(s)?,
        toml::Value::Array(items) => {
            for item in items {
                expand_string_values(item)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                expand_string_values(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        } else {
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                // lone $
                result.push('$');
            } else {
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}
