//! Declaration tree
//!
//! The structured form of an interface header: an ordered list of top-level
//! declarations with full C type information. Types render back to C with
//! [`CType::declare`], which applies the inside-out declarator rules so that
//! pointers to functions and arrays get their grouping parentheses.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A C type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CType {
    /// Builtin, typedef or tagged type (`int`, `HPy`, `struct foo`)
    Named {
        qualifiers: Vec<String>,
        name: String,
    },
    /// Pointer; qualifiers apply to the pointer itself (`char *const`)
    Pointer {
        qualifiers: Vec<String>,
        pointee: Box<CType>,
    },
    /// Array with an optional size expression
    Array {
        element: Box<CType>,
        size: Option<String>,
    },
    /// Function type
    Function { ret: Box<CType>, params: ParamList },
}

/// Parameter list of a function type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParamList {
    pub params: Vec<Param>,
    /// True iff the list ends with `...`
    pub variadic: bool,
}

/// One parameter; the name is optional at this level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: Option<String>,
    pub ty: CType,
}

impl CType {
    /// Unqualified named type
    pub fn named(name: impl Into<String>) -> Self {
        CType::Named {
            qualifiers: Vec::new(),
            name: name.into(),
        }
    }

    /// Unqualified pointer to this type
    pub fn pointer_to(self) -> Self {
        CType::Pointer {
            qualifiers: Vec::new(),
            pointee: Box::new(self),
        }
    }

    /// The no-value type (`void`, unqualified, not a pointer)
    pub fn is_void(&self) -> bool {
        matches!(self, CType::Named { qualifiers, name } if qualifiers.is_empty() && name == "void")
    }

    pub fn is_function(&self) -> bool {
        matches!(self, CType::Function { .. })
    }

    /// Render a declaration of `name` with this type
    ///
    /// ```
    /// # use ctxgen_core::decl::CType;
    /// let fmt = CType::Named { qualifiers: vec!["const".into()], name: "char".into() }.pointer_to();
    /// assert_eq!(fmt.declare("fmt"), "const char *fmt");
    /// assert_eq!(fmt.spelling(), "const char *");
    /// ```
    pub fn declare(&self, name: &str) -> String {
        self.render(name.to_string())
    }

    /// Render the abstract type name
    pub fn spelling(&self) -> String {
        self.render(String::new())
    }

    fn render(&self, inner: String) -> String {
        match self {
            CType::Named { qualifiers, name } => {
                let mut out = qualifiers.join(" ");
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(name);
                if !inner.is_empty() {
                    out.push(' ');
                    out.push_str(&inner);
                }
                out
            }
            CType::Pointer {
                qualifiers,
                pointee,
            } => {
                let mut decl = String::from("*");
                if !qualifiers.is_empty() {
                    decl.push_str(&qualifiers.join(" "));
                    if !inner.is_empty() {
                        decl.push(' ');
                    }
                }
                decl.push_str(&inner);
                if matches!(**pointee, CType::Function { .. } | CType::Array { .. }) {
                    decl = format!("({})", decl);
                }
                pointee.render(decl)
            }
            CType::Array { element, size } => {
                element.render(format!("{}[{}]", inner, size.as_deref().unwrap_or("")))
            }
            CType::Function { ret, params } => ret.render(format!("{}({})", inner, params)),
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(&self.ty.declare(name)),
            None => f.write_str(&self.ty.spelling()),
        }
    }
}

impl fmt::Display for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return f.write_str(if self.variadic { "..." } else { "void" });
        }
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        if self.variadic {
            f.write_str(", ...")?;
        }
        Ok(())
    }
}

/// Storage class and function specifiers; parsed, never re-emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageClass {
    Extern,
    Static,
    Inline,
}

/// One top-level declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared name; `None` for bare tag declarations (`struct foo;`)
    pub name: Option<String>,
    pub ty: CType,
    pub is_typedef: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub storage: Vec<StorageClass>,
    /// Span of the declarator name (or of the specifiers when unnamed)
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

/// Top-level shape of a declaration, as seen by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclShape {
    Typedef,
    Tag,
    Function,
    Variable,
}

impl Declaration {
    pub fn shape(&self) -> DeclShape {
        if self.is_typedef {
            DeclShape::Typedef
        } else if self.name.is_none() {
            DeclShape::Tag
        } else if self.ty.is_function() {
            DeclShape::Function
        } else {
            DeclShape::Variable
        }
    }

    /// Re-emit the declaration without storage class or trailing `;`
    pub fn to_c(&self) -> String {
        self.ty.declare(self.name.as_deref().unwrap_or(""))
    }
}

/// An ordered sequence of top-level declarations
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub declarations: Vec<Declaration>,
}
