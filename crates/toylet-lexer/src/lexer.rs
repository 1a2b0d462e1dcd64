//! Lexer for the Toylet scripting language.

use crate::token::{lookup_identifier, Literal, Token, TokenKind};
use thiserror::Error;
use toylet_diagnostics::{Diagnostics, Position};

/// Malformed constructs the lexer reports while scanning.
///
/// These never stop a scan. They are recorded in the caller's
/// [`Diagnostics`] using their display text as the message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character.")]
    UnexpectedCharacter,

    #[error("Unterminated string.")]
    UnterminatedString,
}

/// Lexer tokenizes Toylet source code.
///
/// `start` marks the first byte of the token being recognized and `current`
/// the next unconsumed byte. Both only move forward.
pub struct Lexer<'src, 'diag> {
    source: &'src str,
    bytes: &'src [u8],
    start: usize,
    current: usize,
    tokens: Vec<Token>,
    diagnostics: &'diag mut Diagnostics,
}

impl<'src, 'diag> Lexer<'src, 'diag> {
    /// Create a new lexer that reports problems into `diagnostics`.
    pub fn new(source: &'src str, diagnostics: &'diag mut Diagnostics) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            start: 0,
            current: 0,
            tokens: Vec::new(),
            diagnostics,
        }
    }

    /// Scan the whole source, always ending with an end-of-file token.
    pub fn scan(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.next_token();
        }

        self.start = self.current;
        self.add(TokenKind::EndOfFile);
        self.tokens
    }

    /// Scan the next lexical unit, which may or may not produce a token.
    fn next_token(&mut self) {
        let c = self.advance();

        match c {
            b' ' | b'\r' | b'\t' | b'\n' => {}

            b'(' => self.add(TokenKind::LeftParen),
            b')' => self.add(TokenKind::RightParen),
            b'{' => self.add(TokenKind::LeftBrace),
            b'}' => self.add(TokenKind::RightBrace),
            b',' => self.add(TokenKind::Comma),
            b'.' => self.add(TokenKind::Dot),
            b'-' => self.add(TokenKind::Minus),
            b'+' => self.add(TokenKind::Plus),
            b';' => self.add(TokenKind::Semicolon),
            b'*' => self.add(TokenKind::Star),

            b'!' => self.add_either(b'=', TokenKind::BangEqual, TokenKind::Bang),
            b'=' => self.add_either(b'=', TokenKind::EqualEqual, TokenKind::Equal),
            b'<' => self.add_either(b'=', TokenKind::LessEqual, TokenKind::Less),
            b'>' => self.add_either(b'=', TokenKind::GreaterEqual, TokenKind::Greater),

            b'/' => {
                if self.match_char(b'/') {
                    // Line comment runs up to, not including, the line break.
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add(TokenKind::Slash);
                }
            }

            b'"' => self.read_string(),

            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() => self.read_identifier(),

            _ => {
                // Swallow the rest of a multi-byte character so it is reported once.
                while is_continuation_byte(self.peek()) {
                    self.advance();
                }
                self.error(LexError::UnexpectedCharacter);
            }
        }
    }

    /// Read a string literal. The opening quote is already consumed.
    ///
    /// Backslashes have no special meaning and strings may span lines.
    fn read_string(&mut self) {
        while self.peek() != b'"' && !self.is_at_end() {
            self.advance();
        }

        if self.is_at_end() {
            self.error(LexError::UnterminatedString);
            return;
        }

        let value = self.source[self.start + 1..self.current].to_string();

        self.advance(); // consume closing quote
        self.add_literal(TokenKind::String, Literal::String(value));
    }

    /// Read a number literal with an optional fractional part.
    fn read_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.advance(); // consume .
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        // Digit runs with an optional digit fraction always parse.
        let value = self.lexeme().parse::<f64>().unwrap_or(f64::NAN);
        self.add_literal(TokenKind::Number, Literal::Number(value));
    }

    /// Read an identifier or keyword.
    fn read_identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() {
            self.advance();
        }

        let kind = lookup_identifier(self.lexeme());
        self.add(kind);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.bytes.len()
    }

    /// Look at the next byte without consuming it. Returns `0` at the end.
    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    /// Look `offset` bytes past the next one without consuming.
    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.current + offset).copied().unwrap_or(b'\0')
    }

    /// Consume and return the next byte. Must not be called at the end.
    fn advance(&mut self) -> u8 {
        let c = self.bytes[self.current];
        self.current += 1;
        c
    }

    /// Consume the next byte only if it equals `expected`.
    fn match_char(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    fn add(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.lexeme(), self.start));
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Literal) {
        self.tokens
            .push(Token::with_literal(kind, self.lexeme(), self.start, literal));
    }

    /// Emit `matched` if the next byte is `expected`, otherwise `single`.
    fn add_either(&mut self, expected: u8, matched: TokenKind, single: TokenKind) {
        let kind = if self.match_char(expected) { matched } else { single };
        self.add(kind);
    }

    /// Record an error at the start of the current token.
    fn error(&mut self, error: LexError) {
        let location = Position::resolve(self.source, self.start);
        tracing::debug!(
            offset = self.start,
            position = %location.position,
            %error,
            "lexical error"
        );
        self.diagnostics
            .add_with_context(location.position, error.to_string(), location.line_text);
    }
}

/// Check if a byte continues a multi-byte UTF-8 sequence.
fn is_continuation_byte(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Scan `source` into tokens, recording malformed input in `diagnostics`.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn scan(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let before = diagnostics.count();
    let tokens = Lexer::new(source, diagnostics).scan();
    tracing::debug!(
        tokens = tokens.len(),
        errors = diagnostics.count() - before,
        "scan complete"
    );
    tokens
}

/// Tokenize an input string, failing with the collected diagnostics if any
/// part of it was malformed.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan(input, &mut diagnostics);
    if diagnostics.is_empty() {
        Ok(tokens)
    } else {
        Err(diagnostics)
    }
}
