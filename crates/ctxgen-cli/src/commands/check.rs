//! Check command - detect drift between generated and committed files

use super::{run_generator, Options};
use anyhow::{Context, Result};
use ctxgen_core::DriftState;

/// Returns false if any artifact is missing or stale
pub fn run(options: &Options) -> Result<bool> {
    let Some(run) = run_generator(options)? else {
        return Ok(false);
    };

    let root = run.config.project_root();
    let drift = run
        .generated
        .check(root)
        .with_context(|| format!("Failed to read artifacts under {}", root.display()))?;

    if options.json {
        let entries: Vec<_> = drift
            .iter()
            .map(|d| {
                serde_json::json!({
                    "artifact": d.kind,
                    "path": d.path.display().to_string(),
                    "state": state_name(d.state),
                })
            })
            .collect();
        println!("{}", serde_json::json!({ "up_to_date": drift.is_empty(), "drift": entries }));
    } else if drift.is_empty() {
        println!("All {} artifacts are up to date", run.generated.artifacts().len());
    } else {
        for d in &drift {
            println!("{}: {} ({})", state_name(d.state), d.path.display(), d.kind);
        }
        eprintln!("Run 'ctxgen generate' to update {} file(s)", drift.len());
    }

    Ok(drift.is_empty())
}

fn state_name(state: DriftState) -> &'static str {
    match state {
        DriftState::Missing => "missing",
        DriftState::Stale => "stale",
    }
}
