//! Classified interface entries

use crate::decl::{CType, Param, ParamList};
use serde::Serialize;

/// One accepted declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Callable(Callable),
    ConstantSlot(ConstantSlot),
}

/// A function of the interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callable {
    pub declared_name: String,
    pub return_type: CType,
    /// Fixed parameters, all named
    pub parameters: Vec<NamedParam>,
    pub is_variadic: bool,
    /// 1-based line of the declaration
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedParam {
    pub name: String,
    pub ty: CType,
}

/// A handle-typed global exposed as a table field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantSlot {
    pub declared_name: String,
    pub value_type: CType,
    pub line: usize,
    pub column: usize,
}

impl Entry {
    pub fn declared_name(&self) -> &str {
        match self {
            Entry::Callable(callable) => &callable.declared_name,
            Entry::ConstantSlot(constant) => &constant.declared_name,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Entry::Callable(callable) => callable.line,
            Entry::ConstantSlot(constant) => constant.line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Entry::Callable(callable) => callable.column,
            Entry::ConstantSlot(constant) => constant.column,
        }
    }

    /// Short label for listings
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entry::Callable(c) if c.is_variadic => "variadic",
            Entry::Callable(_) => "callable",
            Entry::ConstantSlot(_) => "constant",
        }
    }
}

impl Callable {
    /// Parameter list with an explicit tail, leaving `self` untouched
    fn param_list(&self, tail: Option<Param>, variadic: bool) -> ParamList {
        let mut params: Vec<Param> = self
            .parameters
            .iter()
            .map(|p| Param {
                name: Some(p.name.clone()),
                ty: p.ty.clone(),
            })
            .collect();
        params.extend(tail);
        ParamList { params, variadic }
    }

    /// The declared function type
    pub fn function_type(&self) -> CType {
        CType::Function {
            ret: Box::new(self.return_type.clone()),
            params: self.param_list(None, self.is_variadic),
        }
    }

    /// Function type callable through a pointer: the ellipsis becomes `va_list _vl`
    pub fn indirect_type(&self) -> CType {
        let tail = self.is_variadic.then(|| Param {
            name: Some(self.fresh_local("_vl")),
            ty: CType::named("va_list"),
        });
        CType::Function {
            ret: Box::new(self.return_type.clone()),
            params: self.param_list(tail, false),
        }
    }

    /// `base` with `_` appended until no parameter has that name
    pub fn fresh_local(&self, base: &str) -> String {
        let mut name = base.to_string();
        while self.parameters.iter().any(|p| p.name == name) {
            name.push('_');
        }
        name
    }

    /// The original prototype, without storage class
    pub fn signature(&self) -> String {
        self.function_type().declare(&self.declared_name)
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn err_format() -> Callable {
        Callable {
            declared_name: "HPyErr_Format".to_string(),
            return_type: CType::named("HPy"),
            parameters: vec![
                NamedParam {
                    name: "ctx".to_string(),
                    ty: CType::named("HPyContext"),
                },
                NamedParam {
                    name: "fmt".to_string(),
                    ty: CType::Named {
                        qualifiers: vec!["const".to_string()],
                        name: "char".to_string(),
                    }
                    .pointer_to(),
                },
            ],
            is_variadic: true,
            line: 3,
            column: 5,
        }
    }

    #[test]
    fn test_signature_keeps_ellipsis() {
        assert_eq!(
            err_format().signature(),
            "HPy HPyErr_Format(HPyContext ctx, const char *fmt, ...)"
        );
    }

    #[test]
    fn test_indirect_type_replaces_ellipsis() {
        let callable = err_format();
        let indirect = callable.indirect_type().pointer_to();
        assert_eq!(
            indirect.declare("ctx_Err_Format"),
            "HPy (*ctx_Err_Format)(HPyContext ctx, const char *fmt, va_list _vl)"
        );
        assert_eq!(callable, err_format());
    }

    #[test]
    fn test_va_list_name_avoids_parameters() {
        let mut callable = err_format();
        callable.parameters[1].name = "_vl".to_string();
        assert_eq!(callable.fresh_local("_vl"), "_vl_");
        assert_eq!(callable.fresh_local("_res"), "_res");
        assert_eq!(
            callable.indirect_type().pointer_to().declare("ctx_Err_Format"),
            "HPy (*ctx_Err_Format)(HPyContext ctx, const char *_vl, va_list _vl_)"
        );
    }

    #[test]
    fn test_kind_name() {
        let entry = Entry::Callable(err_format());
        assert_eq!(entry.kind_name(), "variadic");
        assert_eq!(entry.declared_name(), "HPyErr_Format");
        assert_eq!(entry.line(), 3);
    }
}
