//! Dispatch table model
//!
//! The named, ordered slot list shared by all four artifacts. Slot field types
//! are built fresh from the immutable entries.

use crate::conventions::Conventions;
use crate::decl::CType;
use crate::entry::Entry;
use crate::error::GenResult;
use crate::naming::assign_slot_names;
use serde::Serialize;

/// Ordered table of slots behind the version field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchTable {
    pub version_field: String,
    pub abi_version: u32,
    pub slots: Vec<Slot>,
}

/// One table field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub name: String,
    /// Bound by the runtime; no trampoline, `NULL` initializer
    pub internal: bool,
    pub entry: Entry,
}

impl DispatchTable {
    /// Name the entries and check that slot names are unique
    pub fn build(entries: Vec<Entry>, conventions: &Conventions) -> GenResult<Self> {
        let names = assign_slot_names(&entries, conventions)?;
        let slots = entries
            .into_iter()
            .zip(names)
            .map(|(entry, name)| Slot {
                internal: conventions.is_internal(entry.declared_name()),
                name,
                entry,
            })
            .collect();

        Ok(Self {
            version_field: conventions.version_field.clone(),
            abi_version: conventions.abi_version,
            slots,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Field names, version field first
    pub fn field_names(&self) -> Vec<&str> {
        std::iter::once(self.version_field.as_str())
            .chain(self.slots.iter().map(|s| s.name.as_str()))
            .collect()
    }
}

impl Slot {
    /// Type of the table field
    pub fn field_type(&self, conventions: &Conventions) -> CType {
        match &self.entry {
            Entry::Callable(callable) => callable.indirect_type().pointer_to(),
            Entry::ConstantSlot(_) => CType::named(conventions.handle_type.as_str()),
        }
    }

    /// `HPy (*ctx_Dup)(HPyContext ctx, HPy h)`
    pub fn field_decl(&self, conventions: &Conventions) -> String {
        self.field_type(conventions).declare(&self.name)
    }

    /// Value bound to the field in the static table
    pub fn initializer(&self, conventions: &Conventions) -> String {
        match &self.entry {
            Entry::Callable(_) if self.internal => "NULL".to_string(),
            Entry::Callable(_) => format!("&{}", self.name),
            Entry::ConstantSlot(_) => format!(
                "({}){{CONSTANT_{}}}",
                conventions.handle_type,
                self.name.to_uppercase()
            ),
        }
    }

    /// Layout tag in the foreign descriptor
    pub fn foreign_tag(&self, conventions: &Conventions) -> String {
        match &self.entry {
            Entry::Callable(_) => "rffi.VOIDP".to_string(),
            Entry::ConstantSlot(_) => conventions.handle_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::source::{DeclarationSource, HeaderSource};
    use ctxgen_config::ConventionsConfig;
    use pretty_assertions::assert_eq;

    fn table_for(header: &str, conventions: &Conventions) -> DispatchTable {
        let unit = HeaderSource::new("api.h", header).parse().unwrap();
        let entries = classify(&unit, conventions, &mut Vec::new()).unwrap();
        DispatchTable::build(entries, conventions).unwrap()
    }

    #[test]
    fn test_version_field_first() {
        let conventions = Conventions::hpy().unwrap();
        let table = table_for(
            "HPy HPy_Dup(HPyContext ctx, HPy h);\nHPy h_None;",
            &conventions,
        );
        assert_eq!(table.field_names(), vec!["ctx_version", "ctx_Dup", "h_None"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_slot_rendering() {
        let conventions = Conventions::hpy().unwrap();
        let table = table_for(
            "HPy HPyErr_Format(HPyContext ctx, const char *fmt, ...);\nHPy h_None;",
            &conventions,
        );
        let callable = &table.slots[0];
        assert_eq!(
            callable.field_decl(&conventions),
            "HPy (*ctx_Err_Format)(HPyContext ctx, const char *fmt, va_list _vl)"
        );
        assert_eq!(callable.initializer(&conventions), "&ctx_Err_Format");
        assert_eq!(callable.foreign_tag(&conventions), "rffi.VOIDP");

        let constant = &table.slots[1];
        assert_eq!(constant.field_decl(&conventions), "HPy h_None");
        assert_eq!(constant.initializer(&conventions), "(HPy){CONSTANT_H_NONE}");
        assert_eq!(constant.foreign_tag(&conventions), "HPy");
    }

    #[test]
    fn test_internal_slot() {
        let conventions = Conventions::from_config(&ConventionsConfig {
            internal: Some(vec!["_HPy_CallRealFunctionFromTrampoline".to_string()]),
            ..Default::default()
        })
        .unwrap();
        let table = table_for(
            "void _HPy_CallRealFunctionFromTrampoline(HPyContext ctx, void *func);",
            &conventions,
        );
        let slot = &table.slots[0];
        assert!(slot.internal);
        assert_eq!(slot.name, "ctx_CallRealFunctionFromTrampoline");
        assert_eq!(slot.initializer(&conventions), "NULL");
    }

    #[test]
    fn test_empty_table() {
        let conventions = Conventions::hpy().unwrap();
        let table = table_for("typedef int HPy;", &conventions);
        assert!(table.is_empty());
        assert_eq!(table.field_names(), vec!["ctx_version"]);
    }
}
