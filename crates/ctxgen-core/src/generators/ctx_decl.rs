//! Dispatch-table struct declaration

use crate::conventions::Conventions;
use crate::emit::Emitter;
use crate::table::DispatchTable;

/// ```c
/// struct _HPyContext_s {
///     int ctx_version;
///     HPy h_None;
///     HPy (*ctx_Module_Create)(HPyContext ctx, HPyModuleDef *def);
/// };
/// ```
pub fn generate(table: &DispatchTable, conventions: &Conventions, out: &mut Emitter) {
    out.line(&format!("struct {} {{", conventions.struct_name));
    out.indent();
    out.line(&format!("int {};", table.version_field));
    for slot in &table.slots {
        out.line(&format!("{};", slot.field_decl(conventions)));
    }
    out.dedent();
    out.line("};");
}

#[cfg(test)]
mod tests {
    use crate::generators::ArtifactKind;
    use crate::testing::table_for;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_struct_fields_in_order() {
        let (table, conventions) = table_for(
            "HPy h_None;\nHPy HPyModule_Create(HPyContext ctx, HPyModuleDef *def);\nHPy HPyErr_Format(HPyContext ctx, const char *fmt, ...);",
        );
        assert_eq!(
            ArtifactKind::ContextDecl.generate(&table, &conventions),
            "struct _HPyContext_s {
    int ctx_version;
    HPy h_None;
    HPy (*ctx_Module_Create)(HPyContext ctx, HPyModuleDef *def);
    HPy (*ctx_Err_Format)(HPyContext ctx, const char *fmt, va_list _vl);
};"
        );
    }

    #[test]
    fn test_empty_table_keeps_version() {
        let (table, conventions) = table_for("");
        assert_eq!(
            ArtifactKind::ContextDecl.generate(&table, &conventions),
            "struct _HPyContext_s {\n    int ctx_version;\n};"
        );
    }
}
