//! Command implementations
//!
//! Every command loads the project configuration, runs the generator in
//! memory and then does its own thing with the result.

pub mod check;
pub mod generate;
pub mod list;

use anyhow::{Context, Result};
use ctxgen_config::{Config, ConfigLoader};
use ctxgen_core::{AutoGen, Conventions, Diagnostic, GenError, Generated, HeaderSource};
use std::path::{Path, PathBuf};

/// Options common to all commands
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

/// A successful in-memory run
pub struct Run {
    pub config: Config,
    pub generated: Generated,
}

/// Load configuration, then parse and render
///
/// Returns `Ok(None)` after printing diagnostics when the header is
/// malformed or unparseable.
pub fn run_generator(options: &Options) -> Result<Option<Run>> {
    let config = load_config(options)?;
    let conventions = Conventions::from_config(&config.project.conventions())
        .context("Invalid naming conventions")?;

    let input = config.input_path();
    let origin = slash_path(&config.input_relative());
    if options.verbose {
        eprintln!("Reading {}", input.display());
    }

    let source = HeaderSource::from_file(&input, origin)
        .with_context(|| format!("Failed to read interface header: {}", input.display()))?;

    let mut warnings = Vec::new();
    let result = AutoGen::new(conventions).run(&source, &mut warnings);
    print_diagnostics(&warnings, options.json);

    match result {
        Ok(generated) => {
            if options.verbose {
                eprintln!(
                    "{} slot(s), {} warning(s)",
                    generated.table().len(),
                    warnings.len()
                );
            }
            Ok(Some(Run { config, generated }))
        }
        Err(err @ (GenError::Syntax { .. } | GenError::Malformed { .. })) => {
            print_diagnostics(err.diagnostics(), options.json);
            eprintln!("error: {}", err);
            Ok(None)
        }
        Err(err) => Err(err).context("Generation failed"),
    }
}

fn load_config(options: &Options) -> Result<Config> {
    let loader = ConfigLoader::new();
    match &options.config {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => {
            let start = match &options.root {
                Some(root) => root.clone(),
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            loader
                .load_from_directory(&start)
                .with_context(|| format!("Failed to load configuration from {}", start.display()))
        }
    }
}

/// `/`-separated form of a relative path
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Print diagnostics to stderr
pub fn print_diagnostics(diagnostics: &[Diagnostic], json: bool) {
    for diag in diagnostics {
        if json {
            match diag.to_json_compact() {
                Ok(line) => eprintln!("{}", line),
                Err(_) => eprintln!("{}", diag.to_human_string()),
            }
        } else {
            eprintln!("{}", diag.to_human_string());
        }
    }
}
