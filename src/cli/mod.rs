//! Command-line interface for the `shortcuts` binary
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and merging with arguments
//! - Parser construction from the effective configuration
//! - Dispatch of the `parse`, `suggest`, `equal`, `validate`, `config` and
//!   `completion` subcommands

pub mod completion;

use clap::{Parser as ClapParser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::ast::{TokenKind, unescape};
use crate::completion::CandidatePools;
use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::{Result, ShortcutError};
use crate::formatter::Formatter;
use crate::parser::Parser;
use crate::validate::ValidationEntry;

/// Keyboard shortcut expression toolkit
#[derive(ClapParser, Debug)]
#[command(
    name = "shortcuts",
    version,
    about = "Parse, complete and validate keyboard shortcut expressions",
    long_about = "Parse shortcut expressions such as `ctrl+shift+k` or `key(note)`, print
their canonical form, suggest completions at a cursor and validate key names."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Separator characters, the first one is canonical (e.g. "+-")
    #[arg(long, value_name = "CHARS", global = true, allow_hyphen_values = true)]
    pub separators: Option<String>,

    /// Enable `key(note)` syntax
    #[arg(long, global = true)]
    pub notes: bool,

    /// Left note delimiter (enables notes)
    #[arg(long, value_name = "CHAR", global = true)]
    pub note_left: Option<String>,

    /// Right note delimiter (enables notes)
    #[arg(long, value_name = "CHAR", global = true)]
    pub note_right: Option<String>,

    /// Output format (text, json, json-pretty, table)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for shortcuts
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a shortcut and print its tree or canonical form
    Parse {
        /// Shortcut expression
        #[arg(value_name = "INPUT", allow_hyphen_values = true)]
        input: String,

        /// Print the full tree as pretty JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest completions at a cursor position
    Suggest {
        /// Shortcut expression
        #[arg(value_name = "INPUT", allow_hyphen_values = true)]
        input: String,

        /// Cursor byte offset, defaults to the end of the input
        #[arg(long, value_name = "INDEX")]
        cursor: Option<usize>,

        /// Candidate key (repeatable), defaults to the configured keys
        #[arg(long = "key", value_name = "KEY")]
        keys: Vec<String>,

        /// Candidate note content (repeatable), defaults to the configured notes
        #[arg(id = "note_candidates", long = "note", value_name = "NOTE")]
        notes: Vec<String>,

        /// Separator inserted by completions
        #[arg(long, value_name = "SEP")]
        separator: Option<String>,

        /// Apply the completion with this index and print the result
        #[arg(long, value_name = "N")]
        apply: Option<usize>,
    },

    /// Check whether two shortcuts are equivalent
    Equal {
        #[arg(value_name = "A", allow_hyphen_values = true)]
        a: String,

        #[arg(value_name = "B", allow_hyphen_values = true)]
        b: String,
    },

    /// Report keys that are not in the configured key list
    Validate {
        /// Shortcut expression
        #[arg(value_name = "INPUT", allow_hyphen_values = true)]
        input: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_parser_args(config, args);
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
    }

    /// Apply grammar-related CLI arguments to configuration
    fn apply_parser_args(config: &mut Config, args: &CliArgs) {
        if let Some(separators) = &args.separators {
            config.parser.separators = separators.chars().map(String::from).collect();
        }

        if let Some(left) = &args.note_left {
            config.parser.note_left = left.clone();
            config.parser.notes = true;
        }

        if let Some(right) = &args.note_right {
            config.parser.note_right = right.clone();
            config.parser.notes = true;
        }

        if args.notes {
            config.parser.notes = true;
        }
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = Self::parse_output_format(format_str);
        }

        if let Some(Commands::Parse { json: true, .. }) = &args.command {
            config.display.format = OutputFormat::JsonPretty;
        }

        if args.no_color {
            config.display.color_output = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Parse output format string
    fn parse_output_format(format_str: &str) -> OutputFormat {
        match format_str.to_lowercase().as_str() {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            "json-pretty" | "jsonpretty" => OutputFormat::JsonPretty,
            "table" => OutputFormat::Table,
            _ => {
                eprintln!("Warning: Unknown format '{}', using default", format_str);
                OutputFormat::Text
            }
        }
    }

    /// Build a parser from the effective configuration
    ///
    /// # Returns
    /// * `Result<Parser>` - Parser or configuration error
    pub fn build_parser(&self) -> Result<Parser> {
        Parser::new(self.config.parser.to_options())
    }

    /// Build a parser whose validator flags keys outside the configured key list.
    ///
    /// Keys are compared unescaped and case-insensitively.
    pub fn build_validating_parser(&self) -> Result<Parser> {
        let known: HashSet<String> = self
            .config
            .candidates
            .keys
            .iter()
            .map(|key| key.to_lowercase())
            .collect();

        let options = self
            .config
            .parser
            .to_options()
            .with_token_validator(move |token| {
                match (token.kind(), token.value()) {
                    (Some(TokenKind::Key), Some(value))
                        if !known.contains(&unescape(value).to_lowercase()) =>
                    {
                        vec![ValidationEntry::new(
                            token.position(),
                            format!("Unknown key: {}", unescape(value)),
                        )]
                    }
                    _ => Vec::new(),
                }
            });
        Parser::new(options)
    }

    fn formatter(&self) -> Formatter {
        Formatter::from_config(&self.config.display)
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled, false if none was given
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Parse { input, .. }) => {
                println!("{}", self.run_parse(input)?);
            }
            Some(Commands::Suggest {
                input,
                cursor,
                keys,
                notes,
                separator,
                apply,
            }) => {
                let pools = self.candidate_pools(keys, notes, separator.as_deref());
                println!("{}", self.run_suggest(input, *cursor, &pools, *apply)?);
            }
            Some(Commands::Equal { a, b }) => {
                println!("{}", self.run_equal(a, b)?);
            }
            Some(Commands::Validate { input }) => {
                println!("{}", self.run_validate(input)?);
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
            }
            Some(Commands::Completion { shell }) => {
                let script = completion::generate_completion(shell, &self.config.candidates.keys)?;
                print!("{}", script);
            }
            None => return Ok(false),
        }
        Ok(true)
    }

    /// Candidate pools from arguments, falling back to the configuration
    fn candidate_pools(&self, keys: &[String], notes: &[String], separator: Option<&str>) -> CandidatePools {
        let keys = if keys.is_empty() {
            self.config.candidates.keys.clone()
        } else {
            keys.to_vec()
        };
        let notes = if notes.is_empty() {
            self.config.candidates.notes.clone()
        } else {
            notes.to_vec()
        };

        let pools = CandidatePools::new(keys, notes);
        match separator {
            Some(separator) => pools.with_separator(separator),
            None => pools,
        }
    }

    /// Parse `input` and format the tree
    pub fn run_parse(&self, input: &str) -> Result<String> {
        let parser = self.build_parser()?;
        let ast = parser.parse(input)?;
        let canonical = if ast.is_valid() {
            Some(parser.stringify(&ast)?)
        } else {
            None
        };
        self.formatter().format_parse(input, &ast, canonical.as_deref())
    }

    /// Suggest completions at `cursor`, optionally applying one of them
    pub fn run_suggest(
        &self,
        input: &str,
        cursor: Option<usize>,
        pools: &CandidatePools,
        apply: Option<usize>,
    ) -> Result<String> {
        let parser = self.build_parser()?;
        let ast = parser.parse(input)?;
        let index = cursor.unwrap_or(input.len());

        let suggestions = parser.autosuggest(input, &ast, index)?;
        let completions = parser.autocomplete(&suggestions, pools);
        debug!(index, completions = completions.len(), "computed completions");

        match apply {
            Some(n) => {
                let completion = completions.get(n).ok_or_else(|| {
                    ShortcutError::Generic(format!(
                        "No completion #{n}, only {} available",
                        completions.len()
                    ))
                })?;
                let replacement = parser.autoreplace(input, completion)?;
                self.formatter().format_replacement(&replacement)
            }
            None => self.formatter().format_completions(&completions),
        }
    }

    pub fn run_equal(&self, a: &str, b: &str) -> Result<String> {
        let parser = self.build_parser()?;
        let equal = parser.equivalent(a, b)?;
        self.formatter().format_equal(equal)
    }

    /// Validate key names of a valid shortcut against the configured keys
    pub fn run_validate(&self, input: &str) -> Result<String> {
        let parser = self.build_validating_parser()?;
        let ast = parser.parse(input)?;
        if !ast.is_valid() {
            return Err(ShortcutError::Generic(format!(
                "Cannot validate an invalid shortcut: {input:?}"
            )));
        }
        let entries = parser.validate(&ast)?;
        self.formatter().format_entries(&entries)
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml_string()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(argv: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        config.display.color_output = false;
        CliInterface { args, config }
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(["shortcuts"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.notes);
    }

    #[test]
    fn test_parse_subcommand_accepts_leading_separator() {
        let args = CliArgs::try_parse_from(["shortcuts", "parse", "-k"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Parse { ref input, .. }) if input == "-k"));
    }

    #[test]
    fn test_parser_args_override_config() {
        let interface = cli(&["shortcuts", "--separators", "-+", "--note-left", "[", "parse", "a"]);
        let config = interface.config();
        assert_eq!(config.parser.separators, vec!["-", "+"]);
        assert!(config.parser.notes);
        assert_eq!(config.parser.note_left, "[");
    }

    #[test]
    fn test_display_and_logging_args() {
        let table = cli(&["shortcuts", "--format", "table", "--vv", "equal", "a", "b"]);
        assert_eq!(table.config().display.format, OutputFormat::Table);
        assert_eq!(table.config().logging.level, LogLevel::Trace);

        let json = cli(&["shortcuts", "parse", "--json", "a"]);
        assert_eq!(json.config().display.format, OutputFormat::JsonPretty);
    }

    #[test]
    fn test_run_parse_text() {
        let interface = cli(&["shortcuts", "parse", "ctrl-k"]);
        assert_eq!(interface.run_parse("ctrl-k").unwrap(), "ctrl-k\nvalid: ctrl+k");
    }

    #[test]
    fn test_run_suggest_and_apply() {
        let interface = cli(&["shortcuts", "--notes", "suggest", "key key"]);
        let pools = CandidatePools::new(Vec::<String>::new(), ["note"]);

        let listing = interface.run_suggest("key key", Some(3), &pools, None).unwrap();
        assert!(listing.contains("(note)"));

        let applied = interface.run_suggest("key key", Some(3), &pools, Some(0)).unwrap();
        assert_eq!(applied, "key(note) key\ncursor: 8");

        assert!(interface.run_suggest("key key", Some(3), &pools, Some(5)).is_err());
    }

    #[test]
    fn test_run_equal() {
        let interface = cli(&["shortcuts", "equal", "a-b", "a+b"]);
        assert_eq!(interface.run_equal("a-b", "a+b").unwrap(), "equivalent");
    }

    #[test]
    fn test_run_validate_flags_unknown_keys() {
        let interface = cli(&["shortcuts", "validate", "ctrl+foo"]);
        assert_eq!(
            interface.run_validate("Ctrl+foo").unwrap(),
            "5..8: Unknown key: foo"
        );
        assert!(interface.run_validate("ctrl+").is_err());
    }

    #[test]
    fn test_candidate_pools_fall_back_to_config() {
        let interface = cli(&["shortcuts", "suggest", "a"]);
        let pools = interface.candidate_pools(&[], &[], Some("-"));
        assert_eq!(pools.keys, interface.config().candidates.keys);
        assert_eq!(pools.separator.as_deref(), Some("-"));
    }
}
