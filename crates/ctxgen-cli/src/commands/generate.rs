//! Generate command - write all artifacts

use super::{run_generator, Options};
use anyhow::{Context, Result};

/// Returns false if generation was refused
pub fn run(options: &Options) -> Result<bool> {
    let Some(run) = run_generator(options)? else {
        return Ok(false);
    };

    let root = run.config.project_root();
    let written = run
        .generated
        .write_to(root)
        .with_context(|| format!("Failed to write artifacts under {}", root.display()))?;

    if options.json {
        let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        println!("{}", serde_json::json!({ "written": paths }));
    } else {
        for path in &written {
            println!("wrote {}", path.display());
        }
    }
    Ok(true)
}
