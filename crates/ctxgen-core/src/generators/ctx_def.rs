//! Static dispatch-table value

use crate::conventions::Conventions;
use crate::emit::Emitter;
use crate::table::DispatchTable;

pub fn generate(table: &DispatchTable, conventions: &Conventions, out: &mut Emitter) {
    out.line(&format!(
        "struct {} {} = {{",
        conventions.struct_name, conventions.global_name
    ));
    out.indent();
    out.line(&format!(".{} = {},", table.version_field, table.abi_version));
    for slot in &table.slots {
        out.line(&format!(".{} = {},", slot.name, slot.initializer(conventions)));
    }
    out.dedent();
    out.line("};");
}
