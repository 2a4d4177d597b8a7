//! Configuration Loader
//!
//! Handles loading configuration and applying overrides with proper precedence.

use crate::project::ProjectConfig;
use crate::{ConfigError, ConfigResult, CONFIG_FILE_NAME, DEFAULT_INPUT};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads `ctxgen.toml` and merges it with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Project config (./ctxgen.toml) - overrides defaults
/// 3. Environment variables (CTXGEN_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Project root directory; generated files are written below it
    pub project_root: PathBuf,

    /// Whether a ctxgen.toml was found
    pub found: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find ctxgen.toml. Without one, the
    /// start directory becomes the project root and defaults apply.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok(Config {
                    project: self.apply_env_overrides(project)?,
                    project_root: current,
                    found: true,
                });
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => {
                    return Ok(Config {
                        project: self.apply_env_overrides(ProjectConfig::default())?,
                        project_root: start_dir.to_path_buf(),
                        found: false,
                    });
                }
            }
        }
    }

    /// Load configuration from a specific ctxgen.toml
    ///
    /// The file's directory becomes the project root.
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project_root = config_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Config {
            project: self.apply_env_overrides(project)?,
            project_root,
            found: true,
        })
    }

    /// Apply environment variable overrides to project config
    ///
    /// Recognized: CTXGEN_INPUT, CTXGEN_ABI_VERSION
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(input) = env::var("CTXGEN_INPUT") {
            config.generator.get_or_insert_with(Default::default).input = Some(PathBuf::from(input));
        }

        if let Ok(version) = env::var("CTXGEN_ABI_VERSION") {
            let version: u32 = version.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "CTXGEN_ABI_VERSION".to_string(),
                reason: format!("'{}' is not a non-negative integer", version),
            })?;
            config
                .conventions
                .get_or_insert_with(Default::default)
                .abi_version = Some(version);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Input path relative to the project root, as written in notices
    pub fn input_relative(&self) -> PathBuf {
        self.project
            .input()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT))
    }

    /// Absolute (root-joined) input path
    pub fn input_path(&self) -> PathBuf {
        self.project_root.join(self.input_relative())
    }

    /// Check if a ctxgen.toml was found
    pub fn is_project(&self) -> bool {
        self.found
    }
}
