use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShioriError};

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub algorithm: Algorithm,
    /// Lowest Sørensen-Dice rating reported as a match.
    pub min_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    /// Text plus the final token stream.
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    SorensenDice,
    Levenshtein,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => f.write_str("built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl AppConfig {
    /// Load config: an explicit file, else the user file (if it exists),
    /// else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::read(path)?, ConfigSource::File(path.to_path_buf())));
        }

        let user_path = Self::config_path();
        if user_path.exists() {
            let config = Self::read(&user_path)?;
            Ok((config, ConfigSource::File(user_path)))
        } else {
            let defaults: AppConfig =
                toml::from_str(DEFAULT_CONFIG).map_err(|e| ShioriError::Config(e.to_string()))?;
            Ok((defaults, ConfigSource::Defaults))
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShioriError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| ShioriError::Config(format!("{}: {e}", path.display())))
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "shiori")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ShioriError::Config(e.to_string()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.pretty);
        assert_eq!(config.logging.filter, "shiori=warn");
        assert_eq!(config.matching.algorithm, Algorithm::SorensenDice);
        assert_eq!(config.matching.min_rating, 0.0);
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = config.to_toml().unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.output.format, config.output.format);
        assert_eq!(deserialized.matching.algorithm, config.matching.algorithm);
        assert_eq!(deserialized.logging.filter, config.logging.filter);
    }

    #[test]
    fn test_partial_file_keeps_other_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [matching]
            algorithm = "levenshtein"
            min_rating = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.matching.algorithm, Algorithm::Levenshtein);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_explicit_missing_file_is_config_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/shiori.toml"))).unwrap_err();
        assert!(matches!(err, ShioriError::Config(_)));
    }
}
