//! Shared helpers for unit tests

use crate::classify::classify;
use crate::conventions::Conventions;
use crate::source::{DeclarationSource, HeaderSource};
use crate::table::DispatchTable;
use ctxgen_config::ConventionsConfig;

/// Table for a header under the default conventions
pub fn table_for(header: &str) -> (DispatchTable, Conventions) {
    table_with(header, &ConventionsConfig::default())
}

pub fn table_with(header: &str, config: &ConventionsConfig) -> (DispatchTable, Conventions) {
    let conventions = Conventions::from_config(config).unwrap();
    let unit = HeaderSource::new("api.h", header).parse().unwrap();
    let entries = classify(&unit, &conventions, &mut Vec::new()).unwrap();
    let table = DispatchTable::build(entries, &conventions).unwrap();
    (table, conventions)
}
