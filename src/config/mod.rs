//! Configuration management for the shortcut parser
//!
//! This module handles two layers of configuration:
//! - [`ParserOptions`] / [`Syntax`]: what a [`Parser`](crate::Parser) is built from
//! - [`Config`]: the TOML file read by the `shortcuts` binary, which also holds
//!   display, logging and candidate pool settings
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

pub mod options;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub use options::{
    ContentTransform, Delimiters, NoteOptions, ParserOptions, Syntax, TokenValidator,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Parser configuration
    #[serde(default)]
    pub parser: ParserConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Candidate pools for suggestions and validation
    #[serde(default)]
    pub candidates: CandidatesConfig,
}

/// Grammar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Separator characters, the first one is canonical
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,

    /// Enable `key(note)` syntax
    #[serde(default)]
    pub notes: bool,

    /// Left note delimiter
    #[serde(default = "default_note_left")]
    pub note_left: String,

    /// Right note delimiter
    #[serde(default = "default_note_right")]
    pub note_right: String,
}

/// Display and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (text, json, json-pretty, table)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,

    /// Table style for suggestion listings
    #[serde(default = "default_table_style")]
    pub table_style: TableStyleConfig,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Highlighted input followed by a short summary
    Text,

    /// Compact JSON format (single-line)
    Json,

    /// Pretty-printed JSON format (multi-line)
    JsonPretty,

    /// Table format
    Table,
}

/// Table border styles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableStyleConfig {
    Modern,
    Ascii,
    Rounded,
    Markdown,
    Psql,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Candidate values offered by completions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesConfig {
    /// Key names; also the set `validate` accepts
    #[serde(default = "default_keys")]
    pub keys: Vec<String>,

    /// Note contents
    #[serde(default)]
    pub notes: Vec<String>,
}

// Default value functions
fn default_separators() -> Vec<String> {
    options::DEFAULT_SEPARATORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_note_left() -> String {
    options::DEFAULT_NOTE_LEFT.to_string()
}

fn default_note_right() -> String {
    options::DEFAULT_NOTE_RIGHT.to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_color_output() -> bool {
    true
}

fn default_table_style() -> TableStyleConfig {
    TableStyleConfig::Modern
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

fn default_keys() -> Vec<String> {
    ["ctrl", "shift", "alt", "meta", "enter", "space", "tab", "esc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            separators: default_separators(),
            notes: false,
            note_left: default_note_left(),
            note_right: default_note_right(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color_output: default_color_output(),
            table_style: default_table_style(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for CandidatesConfig {
    fn default() -> Self {
        Self {
            keys: default_keys(),
            notes: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from an explicit path or the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    ///
    /// # Arguments
    /// * `path` - Optional explicit configuration path
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shortcuts")
            .join("config.toml")
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if a parser can be built from it, error otherwise
    pub fn validate(&self) -> Result<()> {
        Syntax::resolve(&self.parser.to_options())?;
        Ok(())
    }
}

impl ParserConfig {
    /// Build parser options from this section
    pub fn to_options(&self) -> ParserOptions {
        let options = ParserOptions::default().with_separators(self.separators.iter().cloned());
        if self.notes {
            options.with_notes(NoteOptions::new(&self.note_left, &self.note_right))
        } else {
            options
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    /// Check if format is JSON-based
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}
