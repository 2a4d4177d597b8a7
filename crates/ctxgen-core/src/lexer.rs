//! Lexical analysis (tokenization)
//!
//! Converts a C interface header into a stream of tokens. Comments and
//! preprocessor directive lines are skipped; directives are not evaluated.

use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing a header
pub struct Lexer {
    /// Original source text
    source: String,
    /// Characters of the source
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Start position of current token
    start_pos: usize,
    /// Start line of current token
    start_line: usize,
    /// Start column of current token
    start_column: usize,
    /// Only whitespace seen since the last newline
    at_line_start: bool,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let chars: Vec<char> = source.chars().collect();
        Self {
            source,
            chars,
            current: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            at_line_start: true,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the source, returning tokens and any diagnostics
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Scan the next token
    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        self.start_pos = self.current;
        self.start_line = self.line;
        self.start_column = self.column;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();
        self.at_line_start = false;

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            ';' => self.make_token(TokenKind::Semicolon),
            ',' => self.make_token(TokenKind::Comma),
            '*' => self.make_token(TokenKind::Star),
            '=' => {
                if self.peek() == '=' {
                    self.advance();
                    self.make_token(TokenKind::Punct)
                } else {
                    self.make_token(TokenKind::Equal)
                }
            }
            '.' => {
                if self.peek() == '.' && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::Ellipsis)
                } else {
                    self.make_token(TokenKind::Punct)
                }
            }
            '"' => self.quoted('"', TokenKind::String),
            '\'' => self.quoted('\'', TokenKind::Char),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            ':' | '+' | '-' | '/' | '%' | '<' | '>' | '&' | '|' | '^' | '~' | '!' | '?' => {
                self.make_token(TokenKind::Punct)
            }
            _ => self.error_token(
                error_codes::UNEXPECTED_CHARACTER,
                &format!("Unexpected character '{}'", c),
            ),
        }
    }

    /// Skip whitespace, comments and preprocessor directive lines
    fn skip_trivia(&mut self) {
        loop {
            if self.is_at_end() {
                return;
            }

            match self.peek() {
                ' ' | '\r' | '\t' | '\x0c' => {
                    self.advance();
                }
                '\n' => self.newline(),
                '#' if self.at_line_start => self.skip_directive(),
                '/' if self.peek_next() == Some('/') => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    /// Skip a `#...` line, following backslash continuations
    fn skip_directive(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            if self.peek() == '\\' {
                let crlf = self.peek_next() == Some('\r')
                    && self.chars.get(self.current + 2) == Some(&'\n');
                if self.peek_next() == Some('\n') || crlf {
                    self.advance();
                    if crlf {
                        self.advance();
                    }
                    self.newline();
                    continue;
                }
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        let start_pos = self.current;
        let start_line = self.line;
        let start_column = self.column;
        self.advance(); // /
        self.advance(); // *

        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            if self.peek() == '\n' {
                self.newline();
            } else {
                self.advance();
            }
        }

        let snippet = self.line_snippet(start_line);
        self.diagnostics.push(
            Diagnostic::error_with_code(
                error_codes::UNTERMINATED_COMMENT,
                "Unterminated block comment",
                Span::new(start_pos, start_pos + 2),
            )
            .with_position(start_line, start_column)
            .with_snippet(snippet)
            .with_label("comment starts here")
            .with_help("add '*/' to close the comment"),
        );
    }

    /// Scan a string or character literal
    fn quoted(&mut self, delimiter: char, kind: TokenKind) -> Token {
        while !self.is_at_end() && self.peek() != delimiter && self.peek() != '\n' {
            if self.peek() == '\\' {
                self.advance();
                if self.is_at_end() || self.peek() == '\n' {
                    break;
                }
            }
            self.advance();
        }

        if self.is_at_end() || self.peek() != delimiter {
            return self.error_token(
                error_codes::UNTERMINATED_LITERAL,
                "Unterminated literal",
            );
        }

        self.advance();
        self.make_token(kind)
    }

    /// Scan an integer literal, including hex digits and suffixes
    fn number(&mut self) -> Token {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        self.make_token(TokenKind::Number)
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        let text: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    // === Character navigation ===

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn newline(&mut self) {
        self.current += 1;
        self.line += 1;
        self.column = 1;
        self.at_line_start = true;
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    // === Token creation ===

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        Token::new(
            kind,
            lexeme,
            Span::new(self.start_pos, self.current),
            self.start_line,
            self.start_column,
        )
    }

    /// Create an error token and record a diagnostic
    fn error_token(&mut self, code: &str, message: &str) -> Token {
        let span = Span::new(self.start_pos, self.current.max(self.start_pos + 1));
        let snippet = self.line_snippet(self.start_line);

        self.diagnostics.push(
            Diagnostic::error_with_code(code, message, span)
                .with_position(self.start_line, self.start_column)
                .with_snippet(snippet)
                .with_label("lexer error"),
        );

        Token::new(
            TokenKind::Error,
            message,
            span,
            self.start_line,
            self.start_column,
        )
    }

    /// Get the source line for a given line number
    fn line_snippet(&self, line: usize) -> String {
        self.source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or("")
            .to_string()
    }
}
