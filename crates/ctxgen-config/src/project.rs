//! Project Configuration (ctxgen.toml)
//!
//! Handles project-level configuration stored in `ctxgen.toml` at the project root.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from ctxgen.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Generator input settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,

    /// Naming conventions of the interface surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conventions: Option<ConventionsConfig>,
}

/// Generator input configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Interface description, relative to the project root (default: "tools/public_api.h")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
}

/// Naming conventions
///
/// Every field is optional; unset fields fall back to the HPy defaults
/// compiled into the generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConventionsConfig {
    /// Prefix of callable declarations (default: "HPy")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_prefix: Option<String>,

    /// Prefix of constant-slot declarations (default: "h_")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant_prefix: Option<String>,

    /// Prefix of dispatch-table fields for callables (default: "ctx_")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_prefix: Option<String>,

    /// The one type a constant slot may have (default: "HPy")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_type: Option<String>,

    /// Parameter through which trampolines reach the table (default: "ctx")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_param: Option<String>,

    /// Struct tag of the dispatch table (default: "_HPyContext_s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_name: Option<String>,

    /// Name of the static table value (default: "global_ctx")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,

    /// Name of the leading integer field (default: "ctx_version")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_field: Option<String>,

    /// Value of the version field (default: 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abi_version: Option<u32>,

    /// Declared names of internal dispatch primitives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<Vec<String>>,

    /// Variable name of the foreign struct descriptor (default: "HPyContextS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_struct_var: Option<String>,

    /// Command quoted in the do-not-edit notice (default: "make autogen")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regenerate_command: Option<String>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(input) = self.input() {
            if input.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "generator.input".to_string(),
                    reason: "input cannot be empty".to_string(),
                });
            }
            if input.is_absolute() {
                return Err(ConfigError::InvalidPath {
                    field: "generator.input".to_string(),
                    path: input.to_path_buf(),
                });
            }
        }

        if let Some(conventions) = &self.conventions {
            conventions.validate()?;
        }

        Ok(())
    }

    /// Configured input path, if any
    pub fn input(&self) -> Option<&Path> {
        self.generator.as_ref()?.input.as_deref()
    }

    /// Configured conventions, or the all-default table
    pub fn conventions(&self) -> ConventionsConfig {
        self.conventions.clone().unwrap_or_default()
    }
}

impl ConventionsConfig {
    /// Check that every name that ends up in C source is a valid identifier
    pub fn validate(&self) -> ConfigResult<()> {
        let identifiers = [
            ("conventions.api_prefix", &self.api_prefix),
            ("conventions.constant_prefix", &self.constant_prefix),
            ("conventions.slot_prefix", &self.slot_prefix),
            ("conventions.handle_type", &self.handle_type),
            ("conventions.context_param", &self.context_param),
            ("conventions.struct_name", &self.struct_name),
            ("conventions.global_name", &self.global_name),
            ("conventions.version_field", &self.version_field),
            ("conventions.foreign_struct_var", &self.foreign_struct_var),
        ];

        for (field, value) in identifiers {
            if let Some(value) = value {
                if !is_c_identifier(value) {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        reason: format!("'{}' is not a C identifier", value),
                    });
                }
            }
        }

        if let Some(internal) = &self.internal {
            if let Some(bad) = internal.iter().find(|name| !is_c_identifier(name)) {
                return Err(ConfigError::InvalidValue {
                    field: "conventions.internal".to_string(),
                    reason: format!("'{}' is not a C identifier", bad),
                });
            }
        }

        if let Some(command) = &self.regenerate_command {
            if command.trim().is_empty() || command.contains(['\n', '\r']) {
                return Err(ConfigError::InvalidValue {
                    field: "conventions.regenerate_command".to_string(),
                    reason: "command must be a single non-empty line".to_string(),
                });
            }
            // The command is quoted inside a C block comment
            if command.contains("*/") {
                return Err(ConfigError::InvalidValue {
                    field: "conventions.regenerate_command".to_string(),
                    reason: "command must not contain '*/'".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Check that a string is a C identifier
fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
