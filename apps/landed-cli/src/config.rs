//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --format summary --pretty                                          │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     LANDED_LOG, LANDED_FORMAT, LANDED_PRETTY, LANDED_PRECISION         │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config FILE, else landed.toml in the platform config dir:        │
//! │     ~/.config/landed/landed.toml (Linux)                               │
//! │     ~/Library/Application Support/com.landed.landed/ (macOS)           │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # landed.toml
//! log_filter = "info,landed=debug"
//! format = "summary"   # json | summary
//! pretty = true
//! precision = 2
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Most decimals the summary will print.
pub const MAX_PRECISION: usize = 6;

// =============================================================================
// Output Format
// =============================================================================

/// How the recalculated document is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The whole document as JSON.
    #[default]
    Json,
    /// A fixed-width table of totals and items.
    Summary,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "summary" | "text" => Ok(OutputFormat::Summary),
            other => Err(ConfigError::InvalidValue {
                key: "format".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// CLI Configuration
// =============================================================================

/// Settings that outlive a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Output format when `--format` is not given.
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Decimals shown in the summary.
    pub precision: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            log_filter: "info,landed=debug".to_string(),
            format: OutputFormat::Json,
            pretty: false,
            precision: 2,
        }
    }
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `path` when given (must exist), else `landed.toml`
    ///    in the platform config dir (skipped when absent)
    /// 3. Environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// [`CliConfig::load`] with an injectable environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(?path, "loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge(self.precision));
        }
        Ok(())
    }

    fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(filter) = env("LANDED_LOG") {
            self.log_filter = filter;
        }

        if let Some(format) = env("LANDED_FORMAT") {
            self.format = format.parse()?;
        }

        if let Some(pretty) = env("LANDED_PRETTY") {
            self.pretty = match pretty.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid("LANDED_PRETTY", pretty)),
            };
        }

        if let Some(precision) = env("LANDED_PRECISION") {
            self.precision = precision
                .parse()
                .map_err(|_| invalid("LANDED_PRECISION", precision))?;
        }

        Ok(())
    }

    /// `landed.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "landed", "landed")
            .map(|dirs| dirs.config_dir().join("landed.toml"))
    }
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("precision must be at most {max}, got {0}", max = MAX_PRECISION)]
    PrecisionTooLarge(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.precision, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("SUMMARY".parse::<OutputFormat>().unwrap(), OutputFormat::Summary);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_toml_partial_file() {
        let config: CliConfig = toml::from_str("format = \"summary\"\nprecision = 4").unwrap();
        assert_eq!(config.format, OutputFormat::Summary);
        assert_eq!(config.precision, 4);
        assert_eq!(config.log_filter, "info,landed=debug");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env_overrides(env_of(&[
                ("LANDED_FORMAT", "summary"),
                ("LANDED_PRETTY", "yes"),
                ("LANDED_PRECISION", "3"),
                ("LANDED_LOG", "warn"),
            ]))
            .unwrap();

        assert_eq!(config.format, OutputFormat::Summary);
        assert!(config.pretty);
        assert_eq!(config.precision, 3);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let mut config = CliConfig::default();
        let err = config
            .apply_env_overrides(env_of(&[("LANDED_PRETTY", "maybe")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for LANDED_PRETTY: 'maybe'");
    }

    #[test]
    fn test_precision_limit() {
        let mut config = CliConfig::default();
        config.precision = 7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PrecisionTooLarge(7))
        ));
    }

    #[test]
    fn test_load_from_file_then_env() {
        let path = std::env::temp_dir().join(format!("landed-test-{}.toml", std::process::id()));
        std::fs::write(&path, "format = \"summary\"\npretty = true\n").unwrap();

        let config =
            CliConfig::load_with_env(Some(&path), env_of(&[("LANDED_FORMAT", "json")])).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.pretty);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = CliConfig::load_with_env(Some(Path::new("/nonexistent/landed.toml")), |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
