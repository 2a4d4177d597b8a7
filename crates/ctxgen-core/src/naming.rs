//! Slot naming
//!
//! Callables are renamed by replacing the API prefix with the slot prefix;
//! constants keep their declared name. Distinct entries must never share a
//! slot name, and no entry may take the version field's name.

use crate::conventions::Conventions;
use crate::diagnostic::{error_codes, Diagnostic, RelatedLocation};
use crate::entry::Entry;
use crate::error::{GenError, GenResult};
use crate::span::Span;
use std::collections::HashMap;

/// Table field name of an entry
pub fn slot_name(entry: &Entry, conventions: &Conventions) -> String {
    match entry {
        Entry::Callable(callable) => conventions.callable_slot_name(&callable.declared_name),
        Entry::ConstantSlot(constant) => constant.declared_name.clone(),
    }
}

/// Name every entry, failing on any collision
///
/// Every collision is reported, in declaration order, against the first
/// entry that took the name.
pub fn assign_slot_names(entries: &[Entry], conventions: &Conventions) -> GenResult<Vec<String>> {
    let names: Vec<String> = entries.iter().map(|e| slot_name(e, conventions)).collect();
    let mut first_owner: HashMap<&str, usize> = HashMap::new();
    let mut errors = Vec::new();

    for (index, name) in names.iter().enumerate() {
        let entry = &entries[index];

        if *name == conventions.version_field {
            errors.push(
                Diagnostic::error_with_code(
                    error_codes::SLOT_COLLISION,
                    format!(
                        "{} maps to slot '{}', which is the version field",
                        entry.declared_name(),
                        name
                    ),
                    Span::default(),
                )
                .with_position(entry.line(), entry.column())
                .with_label("reserved slot name"),
            );
            continue;
        }

        match first_owner.get(name.as_str()) {
            Some(&owner) => {
                let first = &entries[owner];
                errors.push(
                    Diagnostic::error_with_code(
                        error_codes::SLOT_COLLISION,
                        format!(
                            "{} and {} both map to slot '{}'",
                            first.declared_name(),
                            entry.declared_name(),
                            name
                        ),
                        Span::default(),
                    )
                    .with_position(entry.line(), entry.column())
                    .with_label("duplicate slot name")
                    .with_related_location(RelatedLocation {
                        file: String::new(),
                        line: first.line(),
                        column: first.column(),
                        message: format!("{} declared here", first.declared_name()),
                    }),
                );
            }
            None => {
                first_owner.insert(name.as_str(), index);
            }
        }
    }

    if errors.is_empty() {
        Ok(names)
    } else {
        Err(GenError::malformed(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::CType;
    use crate::entry::{Callable, ConstantSlot};
    use pretty_assertions::assert_eq;

    fn callable(name: &str, line: usize) -> Entry {
        Entry::Callable(Callable {
            declared_name: name.to_string(),
            return_type: CType::named("void"),
            parameters: Vec::new(),
            is_variadic: false,
            line,
            column: 6,
        })
    }

    fn constant(name: &str, line: usize) -> Entry {
        Entry::ConstantSlot(ConstantSlot {
            declared_name: name.to_string(),
            value_type: CType::named("HPy"),
            line,
            column: 5,
        })
    }

    #[test]
    fn test_names_in_order() {
        let conventions = Conventions::hpy().unwrap();
        let entries = vec![callable("HPyModule_Create", 1), constant("h_None", 2)];
        assert_eq!(
            assign_slot_names(&entries, &conventions).unwrap(),
            vec!["ctx_Module_Create", "h_None"]
        );
    }

    #[test]
    fn test_collision_names_both_declarations() {
        let conventions = Conventions::hpy().unwrap();
        let entries = vec![callable("HPy_Dup", 1), callable("_HPy_Dup", 4)];
        let err = assign_slot_names(&entries, &conventions).unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, error_codes::SLOT_COLLISION);
        assert!(diagnostics[0].message.contains("HPy_Dup and _HPy_Dup"));
        assert_eq!(diagnostics[0].line, 4);
        assert_eq!(diagnostics[0].related[0].line, 1);
    }

    #[test]
    fn test_every_collision_reported_against_first_owner() {
        let conventions = Conventions::hpy().unwrap();
        let entries = vec![
            callable("HPy_Dup", 1),
            callable("HPyDup", 2),
            callable("_HPy_Dup", 3),
        ];
        let err = assign_slot_names(&entries, &conventions).unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.related[0].line == 1));
    }

    #[test]
    fn test_version_field_reserved() {
        let config = ctxgen_config::ConventionsConfig {
            constant_prefix: Some("ctx_".to_string()),
            ..Default::default()
        };
        let conventions = Conventions::from_config(&config).unwrap();
        let err = assign_slot_names(&[constant("ctx_version", 1)], &conventions).unwrap_err();
        assert!(err.diagnostics()[0].message.contains("version field"));
    }
}
