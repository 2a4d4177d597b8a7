//! Slot descriptor for the foreign runtime's binding tooling
//!
//! Only names and coarse layout tags: full signatures are not needed to
//! mirror the table.

use crate::conventions::Conventions;
use crate::emit::Emitter;
use crate::table::DispatchTable;

pub fn generate(table: &DispatchTable, conventions: &Conventions, out: &mut Emitter) {
    out.line(&format!(
        "{} = rffi.CStruct('{}',",
        conventions.foreign_struct_var, conventions.struct_name
    ));
    out.indent();
    out.line(&format!("('{}', rffi.INT_real),", table.version_field));
    for slot in &table.slots {
        out.line(&format!("('{}', {}),", slot.name, slot.foreign_tag(conventions)));
    }
    out.line("hints={'eci': eci},");
    out.dedent();
    out.line(")");
}

#[cfg(test)]
mod tests {
    use crate::generators::ArtifactKind;
    use crate::testing::table_for;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor() {
        let (table, conventions) =
            table_for("HPy h_None;\nHPy HPyErr_Format(HPyContext ctx, const char *fmt, ...);");
        assert_eq!(
            ArtifactKind::ForeignDescriptor.generate(&table, &conventions),
            "HPyContextS = rffi.CStruct('_HPyContext_s',
    ('ctx_version', rffi.INT_real),
    ('h_None', HPy),
    ('ctx_Err_Format', rffi.VOIDP),
    hints={'eci': eci},
)"
        );
    }
}
