//! Configuration management for `tola-include.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── include    # [include]
//! │   ├── fetch      # [fetch]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError, diagnostics
//! ├── util           # Config file lookup
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[include]` | Placeholder attribute, site root, error class    |
//! | `[fetch]`   | HTTP client (user agent)                         |
//! | `[serve]`   | Composing proxy (interface, port, upstream)      |
//!
//! The file is optional: without one, every section takes its defaults.

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{FetchConfig, IncludeConfig, ServeConfig};

use util::find_config_file;

use crate::{
    cli::{Cli, Commands, DEFAULT_CONFIG, IncludeArgs, ServeArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing tola-include.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Include pass settings
    #[serde(default)]
    pub include: IncludeConfig,

    /// HTTP client settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Composing proxy settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is fine
    /// unless the user named one explicitly with `--config`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => Self::default(),
        };

        config.apply_command_options(cli);
        config.validate(cli)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        self.apply_include_args(cli.include_args());
        if let Commands::Serve { args } = &cli.command {
            self.apply_serve_args(args);
        }
    }

    fn apply_include_args(&mut self, args: &IncludeArgs) {
        if let Some(root) = &args.site_root {
            self.include.site_root = Some(root.clone());
        }
        Self::update_option(&mut self.include.attribute, args.attribute.as_ref());
    }

    fn apply_serve_args(&mut self, args: &ServeArgs) {
        Self::update_option(&mut self.serve.upstream, args.upstream.as_ref());
        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, cli: &Cli) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        check_attribute_name(&mut diag, "include.attribute", &self.include.attribute);
        check_attribute_name(
            &mut diag,
            "include.root_attribute",
            &self.include.root_attribute,
        );
        if self.include.script.is_empty() {
            diag.error("include.script", "must not be empty");
        }

        if let Commands::Serve { .. } = &cli.command
            && let Err(e) = self.serve.upstream_url()
        {
            diag.push(e);
        }

        diag.into_result()
    }
}

/// Attribute names are matched literally, so whitespace can never match.
fn check_attribute_name(diag: &mut ConfigDiagnostics, field: &'static str, name: &str) {
    if name.is_empty() {
        diag.error(field, "must not be empty");
    } else if name.chars().any(char::is_whitespace) {
        diag.error(field, format!("`{name}` contains whitespace"));
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML string.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
