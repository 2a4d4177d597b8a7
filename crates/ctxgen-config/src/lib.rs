//! ctxgen Configuration System
//!
//! Provides configuration management for ctxgen projects:
//! - Project configuration (ctxgen.toml)
//! - Naming conventions for the generated dispatch table
//! - Environment variable overrides
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults (the HPy universal ABI)
//! 2. Project config (./ctxgen.toml, searched upwards)
//! 3. Environment variables (CTXGEN_*)
//! 4. CLI flags
//!
//! Output destinations are fixed and never read from configuration.
//!
//! # Example
//!
//! ```no_run
//! use ctxgen_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("{}", config.input_path().display());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid path for '{field}': {path} must be relative to the project root")]
    InvalidPath { field: String, path: PathBuf },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "ctxgen.toml";

/// Interface description read when no input is configured
pub const DEFAULT_INPUT: &str = "tools/public_api.h";

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use project::{ConventionsConfig, GeneratorConfig, ProjectConfig};
