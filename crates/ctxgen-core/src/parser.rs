//! Parsing (tokens to declaration tree)
//!
//! Recursive descent over the C declaration grammar used by interface
//! headers: declaration specifiers followed by a comma-separated list of
//! declarators. Declarators nest arbitrarily (pointers, grouping parentheses,
//! array and parameter-list suffixes), so function-pointer parameters parse.
//! Struct, union and enum bodies are skipped; `extern "C" { ... }` blocks are
//! transparent. Initializers and function bodies are syntax errors.

use crate::decl::{CType, Declaration, Param, ParamList, StorageClass, TranslationUnit};
use crate::diagnostic::{error_codes, Diagnostic};
use crate::token::{Token, TokenKind};

/// Builtin type words that combine (`unsigned long int`)
const BUILTIN_TYPE_WORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "_Complex",
];

/// Parser state for building the declaration tree from tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Vec<Diagnostic>,
    /// Open `extern "C" {` blocks
    linkage_depth: usize,
}

/// Parsed declaration specifiers
struct Specifiers {
    base: CType,
    storage: Vec<StorageClass>,
    is_typedef: bool,
}

/// A declarator before it is applied to its base type
struct Declarator {
    name: Option<String>,
    name_token: Option<Token>,
    /// Qualifiers of each `*`, left to right
    pointers: Vec<Vec<String>>,
    suffixes: Vec<Suffix>,
    inner: Option<Box<Declarator>>,
}

enum Suffix {
    Array(Option<String>),
    Params(ParamList),
}

impl Declarator {
    /// Build the declared type inside-out
    fn apply(self, base: CType) -> (Option<String>, Option<Token>, CType) {
        let mut ty = base;
        for qualifiers in self.pointers {
            ty = CType::Pointer {
                qualifiers,
                pointee: Box::new(ty),
            };
        }
        for suffix in self.suffixes.into_iter().rev() {
            ty = match suffix {
                Suffix::Array(size) => CType::Array {
                    element: Box::new(ty),
                    size,
                },
                Suffix::Params(params) => CType::Function {
                    ret: Box::new(ty),
                    params,
                },
            };
        }
        match self.inner {
            Some(inner) => inner.apply(ty),
            None => (self.name, self.name_token, ty),
        }
    }
}

impl Parser {
    /// Create a new parser for the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            linkage_depth: 0,
        }
    }

    /// Parse tokens into a translation unit
    pub fn parse(&mut self) -> (TranslationUnit, Vec<Diagnostic>) {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            if self.match_token(TokenKind::Semicolon) {
                continue;
            }
            if self.linkage_depth > 0 && self.match_token(TokenKind::RightBrace) {
                self.linkage_depth -= 1;
                continue;
            }

            match self.parse_external_declaration() {
                Ok(mut decls) => declarations.append(&mut decls),
                Err(()) => self.synchronize(),
            }
        }

        if self.linkage_depth > 0 {
            self.error("Expected '}' to close extern block");
        }

        (
            TranslationUnit { declarations },
            std::mem::take(&mut self.diagnostics),
        )
    }

    // === Declarations ===

    /// Parse one top-level declaration, which may declare several names
    fn parse_external_declaration(&mut self) -> Result<Vec<Declaration>, ()> {
        if self.check(TokenKind::Extern) && self.peek_kind_at(1) == TokenKind::String {
            self.advance();
            self.advance();
            if self.match_token(TokenKind::LeftBrace) {
                self.linkage_depth += 1;
                return Ok(Vec::new());
            }
        }

        let start = self.peek().clone();
        let specifiers = self.parse_specifiers()?;

        if self.match_token(TokenKind::Semicolon) {
            return Ok(vec![Declaration {
                name: None,
                ty: specifiers.base,
                is_typedef: specifiers.is_typedef,
                storage: specifiers.storage,
                span: start.span,
                line: start.line,
                column: start.column,
            }]);
        }

        let mut declarations = Vec::new();
        loop {
            let declarator = self.parse_declarator()?;
            let (name, name_token, ty) = declarator.apply(specifiers.base.clone());

            let (name, name_token) = match (name, name_token) {
                (Some(name), Some(token)) => (name, token),
                _ => {
                    self.error("Expected a name in declaration");
                    return Err(());
                }
            };

            if self.check(TokenKind::Equal) {
                self.error("Initializers are not supported in interface declarations");
                return Err(());
            }

            if self.check(TokenKind::LeftBrace) {
                self.error("Function definitions are not supported in interface declarations");
                self.skip_braced_body();
                return Ok(Vec::new());
            }

            declarations.push(Declaration {
                name: Some(name),
                ty,
                is_typedef: specifiers.is_typedef,
                storage: specifiers.storage.clone(),
                span: name_token.span,
                line: name_token.line,
                column: name_token.column,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::Semicolon, "Expected ';' after declaration")?;
        Ok(declarations)
    }

    /// Parse declaration specifiers into a base type
    ///
    /// A non-builtin identifier is a typedef name only while no type has been
    /// seen; after that it starts the declarator.
    fn parse_specifiers(&mut self) -> Result<Specifiers, ()> {
        let mut qualifiers = Vec::new();
        let mut storage = Vec::new();
        let mut is_typedef = false;
        let mut words: Vec<String> = Vec::new();
        let mut type_name: Option<String> = None;

        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Typedef => {
                    self.advance();
                    is_typedef = true;
                }
                TokenKind::Extern => {
                    self.advance();
                    storage.push(StorageClass::Extern);
                }
                TokenKind::Static => {
                    self.advance();
                    storage.push(StorageClass::Static);
                }
                TokenKind::Inline => {
                    self.advance();
                    storage.push(StorageClass::Inline);
                }
                kind if kind.is_qualifier() => {
                    self.advance();
                    qualifiers.push(token.lexeme);
                }
                TokenKind::Struct | TokenKind::Union | TokenKind::Enum => {
                    if type_name.is_some() || !words.is_empty() {
                        self.error("Multiple types in declaration specifiers");
                        return Err(());
                    }
                    type_name = Some(self.parse_tag()?);
                }
                TokenKind::Identifier => {
                    let builtin = BUILTIN_TYPE_WORDS.contains(&token.lexeme.as_str());
                    if builtin && type_name.is_none() {
                        self.advance();
                        words.push(token.lexeme);
                    } else if !builtin && type_name.is_none() && words.is_empty() {
                        self.advance();
                        type_name = Some(token.lexeme);
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        let name = match type_name {
            Some(name) => name,
            None if !words.is_empty() => words.join(" "),
            None => {
                self.error("Expected a type specifier");
                return Err(());
            }
        };

        Ok(Specifiers {
            base: CType::Named { qualifiers, name },
            storage,
            is_typedef,
        })
    }

    /// Parse `struct/union/enum [name] [{ ... }]`, returning the type name
    fn parse_tag(&mut self) -> Result<String, ()> {
        let keyword = self.advance().lexeme.clone();
        let tag = if self.check(TokenKind::Identifier) {
            Some(self.advance().lexeme.clone())
        } else {
            None
        };

        let has_body = self.check(TokenKind::LeftBrace);
        if has_body {
            self.skip_braced_body();
        }

        match tag {
            Some(tag) => Ok(format!("{} {}", keyword, tag)),
            None if has_body => Ok(keyword),
            None => {
                self.error(&format!("Expected a name or body after '{}'", keyword));
                Err(())
            }
        }
    }

    /// Parse a (possibly abstract) declarator
    fn parse_declarator(&mut self) -> Result<Declarator, ()> {
        let mut pointers = Vec::new();
        while self.match_token(TokenKind::Star) {
            let mut qualifiers = Vec::new();
            while self.peek().kind.is_qualifier() {
                qualifiers.push(self.advance().lexeme.clone());
            }
            pointers.push(qualifiers);
        }

        let mut name = None;
        let mut name_token = None;
        let mut inner = None;

        if self.check(TokenKind::Identifier) {
            let token = self.advance().clone();
            name = Some(token.lexeme.clone());
            name_token = Some(token);
        } else if self.check(TokenKind::LeftParen)
            && matches!(
                self.peek_kind_at(1),
                TokenKind::Star | TokenKind::LeftParen
            )
        {
            self.advance();
            inner = Some(Box::new(self.parse_declarator()?));
            self.consume(TokenKind::RightParen, "Expected ')' after declarator")?;
        }

        let mut suffixes = Vec::new();
        loop {
            if self.match_token(TokenKind::LeftBracket) {
                let size = if self.check(TokenKind::Number) || self.check(TokenKind::Identifier) {
                    Some(self.advance().lexeme.clone())
                } else {
                    None
                };
                self.consume(TokenKind::RightBracket, "Expected ']' after array size")?;
                suffixes.push(Suffix::Array(size));
            } else if self.match_token(TokenKind::LeftParen) {
                suffixes.push(Suffix::Params(self.parse_param_list()?));
            } else {
                break;
            }
        }

        Ok(Declarator {
            name,
            name_token,
            pointers,
            suffixes,
            inner,
        })
    }

    /// Parse a parameter list after its opening '('
    fn parse_param_list(&mut self) -> Result<ParamList, ()> {
        if self.match_token(TokenKind::RightParen) {
            return Ok(ParamList::default());
        }

        if self.peek().lexeme == "void" && self.peek_kind_at(1) == TokenKind::RightParen {
            self.advance();
            self.advance();
            return Ok(ParamList::default());
        }

        let mut params = Vec::new();
        let mut variadic = false;
        loop {
            if self.match_token(TokenKind::Ellipsis) {
                variadic = true;
                break;
            }

            let specifiers = self.parse_specifiers()?;
            let declarator = self.parse_declarator()?;
            let (name, _, ty) = declarator.apply(specifiers.base);
            params.push(Param { name, ty });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;
        Ok(ParamList { params, variadic })
    }

    /// Skip a brace-balanced body starting at '{'
    fn skip_braced_body(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.advance().kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    // === Helper methods ===

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.current + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.error(message);
            Err(())
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.tokens[self.current].kind == TokenKind::Eof
    }

    /// Record a syntax error at the current token
    fn error(&mut self, message: &str) {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            "end of file".to_string()
        } else {
            format!("'{}'", token.lexeme)
        };
        let diagnostic = Diagnostic::error_with_code(error_codes::SYNTAX_ERROR, message, token.span)
            .with_position(token.line, token.column)
            .with_label(format!("found {}", found));
        self.diagnostics.push(diagnostic);
    }

    /// Skip to just after the next ';'
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.advance().kind == TokenKind::Semicolon {
                return;
            }
        }
    }
}
