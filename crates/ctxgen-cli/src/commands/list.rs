//! List command - show interface entries and their slots

use super::{run_generator, Options};
use anyhow::Result;

pub fn run(options: &Options) -> Result<bool> {
    let Some(run) = run_generator(options)? else {
        return Ok(false);
    };

    let table = run.generated.table();
    if options.json {
        let slots: Vec<_> = table
            .slots
            .iter()
            .map(|slot| {
                serde_json::json!({
                    "name": slot.entry.declared_name(),
                    "kind": slot.entry.kind_name(),
                    "slot": slot.name,
                    "internal": slot.internal,
                    "line": slot.entry.line(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({
                "version_field": table.version_field,
                "abi_version": table.abi_version,
                "slots": slots,
            })
        );
    } else {
        for slot in &table.slots {
            let marker = if slot.internal { " (internal)" } else { "" };
            println!(
                "{:<9} {} -> {}{}",
                slot.entry.kind_name(),
                slot.entry.declared_name(),
                slot.name,
                marker
            );
        }
    }
    Ok(true)
}
