//! Artifact generators
//!
//! Each generator renders one view of the dispatch table. They only read
//! the table and the conventions, and write into their own [`Emitter`].

pub mod ctx_decl;
pub mod ctx_def;
pub mod foreign;
pub mod trampolines;

use crate::conventions::Conventions;
use crate::emit::Emitter;
use crate::table::DispatchTable;
use serde::Serialize;
use std::fmt;

/// The generated files, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Dispatch-table struct declaration
    ContextDecl,
    /// Static table value
    ContextDef,
    /// Inline forwarding functions
    Trampolines,
    /// Slot listing for the foreign runtime
    ForeignDescriptor,
}

/// How the do-not-edit notice is commented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`
    Block,
    /// `# ...`
    Hash,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::ContextDecl,
        ArtifactKind::ContextDef,
        ArtifactKind::Trampolines,
        ArtifactKind::ForeignDescriptor,
    ];

    /// Destination relative to the project root, `/`-separated
    pub fn relative_path(self) -> &'static str {
        match self {
            ArtifactKind::ContextDecl => "hpy-api/hpy_devel/include/universal/autogen_ctx.h",
            ArtifactKind::ContextDef => "cpython-universal/src/autogen_ctx_def.h",
            ArtifactKind::Trampolines => "hpy-api/hpy_devel/include/universal/autogen_func.h",
            ArtifactKind::ForeignDescriptor => "tools/autogen_pypy.txt",
        }
    }

    pub fn comment_style(self) -> CommentStyle {
        match self {
            ArtifactKind::ForeignDescriptor => CommentStyle::Hash,
            _ => CommentStyle::Block,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::ContextDecl => "context declaration",
            ArtifactKind::ContextDef => "context definition",
            ArtifactKind::Trampolines => "trampolines",
            ArtifactKind::ForeignDescriptor => "foreign descriptor",
        }
    }

    /// Render the body of this artifact
    pub fn generate(self, table: &DispatchTable, conventions: &Conventions) -> String {
        let mut out = Emitter::default();
        match self {
            ArtifactKind::ContextDecl => ctx_decl::generate(table, conventions, &mut out),
            ArtifactKind::ContextDef => ctx_def::generate(table, conventions, &mut out),
            ArtifactKind::Trampolines => trampolines::generate(table, conventions, &mut out),
            ArtifactKind::ForeignDescriptor => foreign::generate(table, conventions, &mut out),
        }
        out.finish()
    }

    /// Full file contents: notice, blank line, body, final newline
    pub fn render(self, table: &DispatchTable, conventions: &Conventions, origin: &str) -> String {
        format!(
            "{}\n{}\n",
            notice(self.comment_style(), conventions, origin),
            self.generate(table, conventions)
        )
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The do-not-edit notice, ending with a newline
pub fn notice(style: CommentStyle, conventions: &Conventions, origin: &str) -> String {
    let body = [
        "DO NOT EDIT THIS FILE!".to_string(),
        String::new(),
        format!(
            "This file is automatically generated by {} from {}.",
            conventions.tool_name, origin
        ),
        "Run this to regenerate:".to_string(),
        format!("    {}", conventions.regenerate_command),
    ];

    let mut out = Emitter::default();
    match style {
        CommentStyle::Block => {
            out.line("/*");
            for text in &body {
                out.line(&indented(text, "   "));
            }
            out.blank_line();
            out.line("*/");
        }
        CommentStyle::Hash => {
            for text in &body {
                match text.as_str() {
                    "" => out.line("#"),
                    text => out.line(&format!("# {}", text)),
                }
            }
        }
    }
    let mut text = out.finish();
    text.push('\n');
    text
}

fn indented(text: &str, prefix: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, text)
    }
}
