//! Declaration sources
//!
//! The driver reads declarations through [`DeclarationSource`]; the shipped
//! implementation parses a C header with the crate's own lexer and parser.

use crate::decl::TranslationUnit;
use crate::diagnostic::Diagnostic;
use crate::error::{GenError, GenResult};
use crate::lexer::Lexer;
use crate::parser::Parser;
use std::path::Path;

/// Supplier of an ordered declaration tree
pub trait DeclarationSource {
    /// Name of the input as it appears in diagnostics and generated notices
    fn origin(&self) -> &str;

    /// Parse the whole input; any syntax diagnostic fails the source
    fn parse(&self) -> Result<TranslationUnit, Vec<Diagnostic>>;

    /// Source text of a 1-based line, for diagnostic snippets
    fn line_text(&self, _line: usize) -> Option<&str> {
        None
    }
}

/// A C interface header held in memory
#[derive(Debug, Clone)]
pub struct HeaderSource {
    origin: String,
    text: String,
}

impl HeaderSource {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// Read a header from disk; `origin` is the name reported for it
    pub fn from_file(path: &Path, origin: impl Into<String>) -> GenResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Ok(Self::new(origin, text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DeclarationSource for HeaderSource {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn parse(&self) -> Result<TranslationUnit, Vec<Diagnostic>> {
        let (tokens, lex_diagnostics) = Lexer::new(self.text.as_str()).tokenize();
        if !lex_diagnostics.is_empty() {
            return Err(self.locate(lex_diagnostics));
        }

        let (unit, parse_diagnostics) = Parser::new(tokens).parse();
        if !parse_diagnostics.is_empty() {
            return Err(self.locate(parse_diagnostics));
        }

        Ok(unit)
    }

    fn line_text(&self, line: usize) -> Option<&str> {
        self.text.lines().nth(line.checked_sub(1)?)
    }
}

impl HeaderSource {
    /// Attach the origin and source line to each diagnostic
    fn locate(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        diagnostics
            .into_iter()
            .map(|diag| {
                let mut diag = diag.with_file(self.origin.as_str());
                if diag.snippet.is_empty() {
                    if let Some(text) = self.line_text(diag.line) {
                        diag.snippet = text.to_string();
                    }
                }
                diag
            })
            .collect()
    }
}
