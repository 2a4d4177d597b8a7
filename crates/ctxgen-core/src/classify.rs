//! Classification of declarations into interface entries
//!
//! Functions whose name matches the API prefix become callables; variables
//! with the constant prefix become constant slots. Anything else is dropped
//! with a warning. Typedefs and bare tag declarations are dropped silently.
//!
//! A declaration that matches the convention but breaks the table's
//! structure is fatal. All such problems are collected before failing.

use crate::conventions::Conventions;
use crate::decl::{CType, DeclShape, Declaration, TranslationUnit};
use crate::diagnostic::{error_codes, Diagnostic};
use crate::entry::{Callable, ConstantSlot, Entry, NamedParam};
use crate::error::{GenError, GenResult};

/// Partition declarations into entries, in declaration order
///
/// Warnings go to `sink`; fatal diagnostics are returned in
/// [`GenError::Malformed`].
pub fn classify(
    unit: &TranslationUnit,
    conventions: &Conventions,
    sink: &mut Vec<Diagnostic>,
) -> GenResult<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for decl in &unit.declarations {
        let name = match (&decl.name, decl.shape()) {
            (_, DeclShape::Typedef) | (_, DeclShape::Tag) | (None, _) => continue,
            (Some(name), _) => name,
        };

        match &decl.ty {
            CType::Function { ret, params } => {
                if !conventions.is_callable_name(name) {
                    sink.push(ignored(
                        decl,
                        error_codes::IGNORED_FUNCTION,
                        format!("Ignoring non-interface declaration: {}", name),
                        format!("callable names start with '{}'", conventions.api_prefix),
                    ));
                    continue;
                }

                let mut parameters = Vec::with_capacity(params.params.len());
                let mut complete = true;
                for (index, param) in params.params.iter().enumerate() {
                    match &param.name {
                        Some(param_name) => parameters.push(NamedParam {
                            name: param_name.clone(),
                            ty: param.ty.clone(),
                        }),
                        None => {
                            complete = false;
                            errors.push(
                                fatal(
                                    decl,
                                    error_codes::UNNAMED_PARAMETER,
                                    format!(
                                        "Unnamed parameter {} in declaration of {}",
                                        index + 1,
                                        name
                                    ),
                                )
                                .with_label(format!("parameter of type '{}'", param.ty))
                                .with_help("trampolines forward parameters by name"),
                            );
                        }
                    }
                }

                if params.variadic && params.params.is_empty() {
                    complete = false;
                    errors.push(
                        fatal(
                            decl,
                            error_codes::VARIADIC_WITHOUT_ANCHOR,
                            format!("Variadic function {} has no named parameter", name),
                        )
                        .with_help("va_start needs the last named parameter"),
                    );
                }

                if complete
                    && !conventions.is_internal(name)
                    && !parameters.iter().any(|p| p.name == conventions.context_param)
                {
                    complete = false;
                    errors.push(
                        fatal(
                            decl,
                            error_codes::MISSING_CONTEXT,
                            format!(
                                "Callable {} has no '{}' parameter",
                                name, conventions.context_param
                            ),
                        )
                        .with_label("no context parameter")
                        .with_help(format!(
                            "trampolines call through '{}->...'",
                            conventions.context_param
                        )),
                    );
                }

                if complete {
                    entries.push(Entry::Callable(Callable {
                        declared_name: name.clone(),
                        return_type: (**ret).clone(),
                        parameters,
                        is_variadic: params.variadic,
                        line: decl.line,
                        column: decl.column,
                    }));
                }
            }
            ty => {
                if !conventions.is_constant_name(name) {
                    sink.push(ignored(
                        decl,
                        error_codes::IGNORED_VARIABLE,
                        format!("Ignoring non-interface variable declaration: {}", name),
                        format!(
                            "constant slots start with '{}'",
                            conventions.constant_prefix
                        ),
                    ));
                    continue;
                }

                if !is_handle(ty, conventions) {
                    errors.push(
                        fatal(
                            decl,
                            error_codes::CONSTANT_TYPE_MISMATCH,
                            format!(
                                "Constant {} has type '{}', expected '{}'",
                                name,
                                ty.spelling(),
                                conventions.handle_type
                            ),
                        )
                        .with_label("wrong constant type"),
                    );
                    continue;
                }

                entries.push(Entry::ConstantSlot(ConstantSlot {
                    declared_name: name.clone(),
                    value_type: ty.clone(),
                    line: decl.line,
                    column: decl.column,
                }));
            }
        }
    }

    if errors.is_empty() {
        Ok(entries)
    } else {
        Err(GenError::malformed(errors))
    }
}

/// Qualifiers are allowed on constants; the slot itself is always unqualified
fn is_handle(ty: &CType, conventions: &Conventions) -> bool {
    matches!(ty, CType::Named { name, .. } if *name == conventions.handle_type)
}

fn ignored(decl: &Declaration, code: &str, message: String, note: String) -> Diagnostic {
    Diagnostic::warning_with_code(code, message, decl.span)
        .with_position(decl.line, decl.column)
        .with_label("dropped from all artifacts")
        .with_note(note)
}

fn fatal(decl: &Declaration, code: &str, message: String) -> Diagnostic {
    Diagnostic::error_with_code(code, message, decl.span).with_position(decl.line, decl.column)
}
