//! Token types for lexical analysis
//!
//! Defines the token types of the C declaration subset read from interface headers.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Source location
    pub span: Span,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Token {
    /// Create a new token
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        span: Span,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            line,
            column,
        }
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Identifier (type words like `int` included)
    Identifier,
    /// Integer literal (42, 0x10, 8u)
    Number,
    /// String literal ("C")
    String,
    /// Character literal ('a')
    Char,

    // Keywords
    /// `typedef`
    Typedef,
    /// `extern`
    Extern,
    /// `static`
    Static,
    /// `inline`
    Inline,
    /// `const`
    Const,
    /// `volatile`
    Volatile,
    /// `restrict`
    Restrict,
    /// `struct`
    Struct,
    /// `union`
    Union,
    /// `enum`
    Enum,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `*`
    Star,
    /// `=`
    Equal,
    /// `...`
    Ellipsis,
    /// Any other operator character (only meaningful inside skipped bodies)
    Punct,

    // Special
    /// Lexer error
    Error,
    /// End of file
    Eof,
}

impl TokenKind {
    /// Keyword kind for an identifier-shaped lexeme
    pub fn keyword(s: &str) -> Option<TokenKind> {
        match s {
            "typedef" => Some(TokenKind::Typedef),
            "extern" => Some(TokenKind::Extern),
            "static" => Some(TokenKind::Static),
            "inline" | "__inline" | "__inline__" => Some(TokenKind::Inline),
            "const" => Some(TokenKind::Const),
            "volatile" => Some(TokenKind::Volatile),
            "restrict" | "__restrict" => Some(TokenKind::Restrict),
            "struct" => Some(TokenKind::Struct),
            "union" => Some(TokenKind::Union),
            "enum" => Some(TokenKind::Enum),
            _ => None,
        }
    }

    /// Type qualifier keywords
    pub fn is_qualifier(self) -> bool {
        matches!(
            self,
            TokenKind::Const | TokenKind::Volatile | TokenKind::Restrict
        )
    }
}
