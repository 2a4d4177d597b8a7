//! Naming conventions of an interface surface
//!
//! Every literal the generators emit comes from here. The defaults describe
//! the HPy universal ABI.

use crate::error::{GenError, GenResult};
use ctxgen_config::ConventionsConfig;
use regex::{NoExpand, Regex};

/// Fixed naming rules, parameterised
#[derive(Debug, Clone)]
pub struct Conventions {
    pub api_prefix: String,
    pub constant_prefix: String,
    pub slot_prefix: String,
    pub handle_type: String,
    pub context_param: String,
    pub struct_name: String,
    pub global_name: String,
    pub version_field: String,
    pub abi_version: u32,
    pub internal: Vec<String>,
    pub foreign_struct_var: String,
    pub tool_name: String,
    pub regenerate_command: String,
    /// `^_?<api>`
    callable_pattern: Regex,
    /// `^_?<api>_?`
    slot_pattern: Regex,
}

impl Conventions {
    /// The HPy defaults
    pub fn hpy() -> GenResult<Self> {
        Self::from_config(&ConventionsConfig::default())
    }

    /// Apply configured overrides on top of the HPy defaults
    pub fn from_config(config: &ConventionsConfig) -> GenResult<Self> {
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };

        let api_prefix = pick(&config.api_prefix, "HPy");
        let constant_prefix = pick(&config.constant_prefix, "h_");

        for (field, value) in [
            ("api_prefix", &api_prefix),
            ("constant_prefix", &constant_prefix),
        ] {
            if value.is_empty() {
                return Err(GenError::InvalidConvention(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        let escaped = regex::escape(&api_prefix);
        let callable_pattern = compile(&format!("^_?{}", escaped))?;
        let slot_pattern = compile(&format!("^_?{}_?", escaped))?;

        Ok(Self {
            api_prefix,
            constant_prefix,
            slot_prefix: pick(&config.slot_prefix, "ctx_"),
            handle_type: pick(&config.handle_type, "HPy"),
            context_param: pick(&config.context_param, "ctx"),
            struct_name: pick(&config.struct_name, "_HPyContext_s"),
            global_name: pick(&config.global_name, "global_ctx"),
            version_field: pick(&config.version_field, "ctx_version"),
            abi_version: config.abi_version.unwrap_or(1),
            internal: config.internal.clone().unwrap_or_default(),
            foreign_struct_var: pick(&config.foreign_struct_var, "HPyContextS"),
            tool_name: "ctxgen".to_string(),
            regenerate_command: pick(&config.regenerate_command, "make autogen"),
            callable_pattern,
            slot_pattern,
        })
    }

    /// Function names accepted as part of the interface
    pub fn is_callable_name(&self, name: &str) -> bool {
        self.callable_pattern.is_match(name)
    }

    /// Variable names accepted as constant slots
    pub fn is_constant_name(&self, name: &str) -> bool {
        name.starts_with(&self.constant_prefix)
    }

    /// `HPyModule_Create` -> `ctx_Module_Create`
    pub fn callable_slot_name(&self, declared: &str) -> String {
        self.slot_pattern
            .replace(declared, NoExpand(&self.slot_prefix))
            .into_owned()
    }

    /// Dispatch primitives bound by the runtime itself
    pub fn is_internal(&self, declared: &str) -> bool {
        self.internal.iter().any(|name| name == declared)
    }
}

fn compile(pattern: &str) -> GenResult<Regex> {
    Regex::new(pattern).map_err(|e| GenError::InvalidConvention(e.to_string()))
}
