//! Inline trampolines
//!
//! Each callable keeps its declared prototype and forwards to its table
//! slot through the context parameter. A variadic callable captures its
//! trailing arguments into a `va_list` and forwards that as one argument,
//! since the indirect call cannot carry `...` itself.

use crate::conventions::Conventions;
use crate::emit::Emitter;
use crate::entry::{Callable, Entry};
use crate::table::DispatchTable;

pub fn generate(table: &DispatchTable, conventions: &Conventions, out: &mut Emitter) {
    let mut first = true;
    for slot in &table.slots {
        let callable = match &slot.entry {
            Entry::Callable(callable) if !slot.internal => callable,
            _ => continue,
        };
        if !first {
            out.blank_line();
        }
        first = false;
        trampoline(callable, &slot.name, conventions, out);
    }
}

/// Emit the trampoline of one callable
pub fn trampoline(callable: &Callable, slot_name: &str, conventions: &Conventions, out: &mut Emitter) {
    let target = format!("{}->{}", conventions.context_param, slot_name);
    // Locals of the variadic form, renamed away from the parameters
    let va = callable.fresh_local("_vl");
    let res = callable.fresh_local("_res");
    let mut args: Vec<&str> = callable.parameters.iter().map(|p| p.name.as_str()).collect();

    out.line(&format!("static inline {} {{", callable.signature()));
    out.indent();

    if callable.is_variadic {
        // The classifier guarantees at least one named parameter here
        let anchor = args.last().copied().unwrap_or_default();
        out.line(&format!("va_list {};", va));
        out.line(&format!("va_start({}, {});", va, anchor));
        args.push(va.as_str());
        let call = format!("{}({});", target, args.join(", "));
        if callable.returns_void() {
            out.line(&call);
            out.line(&format!("va_end({});", va));
        } else {
            out.line(&format!("{} = {}", callable.return_type.declare(&res), call));
            out.line(&format!("va_end({});", va));
            out.line(&format!("return {};", res));
        }
    } else {
        let call = format!("{}({});", target, args.join(", "));
        if callable.returns_void() {
            out.line(&call);
        } else {
            out.line(&format!("return {}", call));
        }
    }

    out.dedent();
    out.line("}");
}
