//! Core Lipona lexer — converts source text to a token stream.
//!
//! Features:
//! - All 15 reserved words, the arithmetic operators and call punctuation
//! - String literals pre-split into text and `{expr}` segments; the lexer
//!   matches nested braces and skips quoted strings inside a segment
//! - Single-line comments stripped (`//`)
//! - Newlines are plain whitespace
//! - Error recovery: collects up to 20 errors instead of stopping at the first

use lipona_types::ast::StringPart;
use lipona_types::{Diagnostic, Diagnostics, ErrorCode, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The Lipona lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting up to
/// [`lipona_types::MAX_ERRORS`] errors along the way.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, counted in characters).
    col: u32,
    /// Collected errors.
    errors: Diagnostics,
}

/// Result of lexing: tokens + any errors collected.
#[derive(Debug)]
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: Diagnostics,
}

/// Position snapshot taken at the start of a token.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.source,
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: Diagnostics::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        while !self.errors.is_full() {
            if let Some(token) = self.scan_token() {
                let is_eof = token.kind == TokenKind::Eof;
                tokens.push(token);
                if is_eof {
                    break;
                }
            }
        }

        // Ensure token stream always ends with Eof
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, "", self.current_span()));
        }

        tracing::trace!(
            file = %self.source_file.name,
            tokens = tokens.len(),
            errors = self.errors.total_errors,
            "lexed source"
        );

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    /// Span from `start` to the last consumed character.
    fn span_from(&self, start: Mark) -> Span {
        Span::new(
            start.line,
            start.col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn text_from(&self, start: Mark) -> &'src str {
        let source = self.source;
        &source[start.pos..self.pos]
    }

    fn text_between(&self, start: Mark, end: Mark) -> &'src str {
        let source = self.source;
        &source[start.pos..end.pos]
    }

    fn token_from(&self, kind: TokenKind, start: Mark) -> Token {
        Token::new(kind, self.text_from(start), self.span_from(start))
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = Diagnostic::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push(err);
    }

    fn emit_error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = Diagnostic::new(&self.source_file.name, code, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace (newlines included) and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token. Returns `None` when the input at the cursor was
    /// rejected and skipped; the caller simply tries again.
    fn scan_token(&mut self) -> Option<Token> {
        self.skip_trivia();

        let start = self.mark();
        let Some(ch) = self.advance() else {
            return Some(Token::new(TokenKind::Eof, "", self.current_span()));
        };

        let kind = match ch {
            '"' => return Some(self.scan_string(start)),
            '0'..='9' => return self.scan_number(start),
            'a'..='z' | 'A'..='Z' | '_' => return Some(self.scan_identifier(start)),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,

            '{' | '}' => {
                let span = self.span_from(start);
                self.emit_error_with_suggestion(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{ch}'"),
                    span,
                    "blocks are written 'open' ... 'pini'",
                );
                return None;
            }
            '=' | '<' | '>' | '!' => {
                let span = self.span_from(start);
                self.emit_error_with_suggestion(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{ch}'"),
                    span,
                    "use 'jo' to assign and 'sama', 'suli' or 'lili' to compare",
                );
                return None;
            }
            _ => {
                let span = self.span_from(start);
                self.emit_error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{}'", ch.escape_debug()),
                    span,
                );
                return None;
            }
        };

        Some(self.token_from(kind, start))
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start: Mark) -> Option<Token> {
        // We already consumed the first digit
        while let Some('0'..='9') = self.peek() {
            self.advance();
        }

        // A fraction needs at least one digit after the point
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some('0'..='9')) {
            self.advance();
            while let Some('0'..='9') = self.peek() {
                self.advance();
            }
        }

        if matches!(self.peek(), Some('a'..='z' | 'A'..='Z' | '_')) {
            while matches!(self.peek(), Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_')) {
                self.advance();
            }
            let span = self.span_from(start);
            let text = self.text_from(start);
            self.emit_error_with_suggestion(
                ErrorCode::INVALID_NUMBER,
                format!("invalid number literal '{text}'"),
                span,
                "identifiers cannot start with a digit",
            );
            return None;
        }

        let text = self.text_from(start);
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(self.token_from(TokenKind::Number(value), start)),
            _ => {
                let span = self.span_from(start);
                self.emit_error(
                    ErrorCode::INVALID_NUMBER,
                    format!("number literal '{text}' is out of range"),
                    span,
                );
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: Mark) -> Token {
        // First character was already consumed (letter or `_`)
        while matches!(self.peek(), Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_')) {
            self.advance();
        }

        let text = self.text_from(start);
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        self.token_from(kind, start)
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal. The opening `"` has been consumed.
    ///
    /// Always produces a token so the parser sees a value in expression
    /// position even when the literal was malformed.
    fn scan_string(&mut self, start: Mark) -> Token {
        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            match self.peek() {
                None => {
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        self.span_from(start),
                        "close the string with '\"'",
                    );
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    if let Some(ch) = self.scan_escape() {
                        text.push(ch);
                    }
                }
                Some('{') => {
                    if !text.is_empty() {
                        parts.push(StringPart::Literal(std::mem::take(&mut text)));
                    }
                    match self.scan_interpolation() {
                        Ok(Some(part)) => parts.push(part),
                        Ok(None) => {}
                        // Nothing sensible follows an unclosed segment.
                        Err(()) => break,
                    }
                }
                Some(ch) => {
                    self.advance();
                    text.push(ch);
                }
            }
        }

        if !text.is_empty() {
            parts.push(StringPart::Literal(text));
        }
        self.token_from(TokenKind::String(parts), start)
    }

    /// Scan a backslash escape. Returns `None` for an invalid escape, which
    /// is reported and dropped from the literal.
    fn scan_escape(&mut self) -> Option<char> {
        let start = self.mark();
        self.advance(); // '\\'
        let resolved = match self.peek() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('{') => '{',
            Some('}') => '}',
            Some(other) => {
                self.advance();
                self.emit_error_with_suggestion(
                    ErrorCode::INVALID_ESCAPE,
                    format!("invalid escape sequence '\\{}'", other.escape_debug()),
                    self.span_from(start),
                    "valid escapes are \\n \\t \\r \\\\ \\\" \\{ \\}",
                );
                return None;
            }
            // The unterminated string is reported by the caller.
            None => return None,
        };
        self.advance();
        Some(resolved)
    }

    /// Scan an embedded `{expr}` segment. The cursor sits on the `{`.
    ///
    /// Returns `Ok(None)` for an empty segment (reported) and `Err(())` when
    /// input ends before the closing `}`.
    fn scan_interpolation(&mut self) -> Result<Option<StringPart>, ()> {
        let open = self.mark();
        self.advance(); // '{'
        let code_start = self.mark();
        let mut depth = 0u32;

        let code_end = loop {
            match self.peek() {
                None => {
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_INTERPOLATION,
                        "unterminated '{' in string literal",
                        self.span_from(open),
                        "close the embedded expression with '}', or write '\\{' for a literal brace",
                    );
                    return Err(());
                }
                Some('{') => {
                    depth += 1;
                    self.advance();
                }
                Some('}') if depth == 0 => {
                    let end = self.mark();
                    self.advance();
                    break end;
                }
                Some('}') => {
                    depth -= 1;
                    self.advance();
                }
                Some('"') => self.skip_nested_string(),
                Some(_) => {
                    self.advance();
                }
            }
        };

        let source = self.text_between(code_start, code_end);
        if source.trim().is_empty() {
            self.emit_error_with_suggestion(
                ErrorCode::EMPTY_INTERPOLATION,
                "empty '{}' in string literal",
                self.span_from(open),
                "put an expression inside the braces, or write '\\{\\}' for literal braces",
            );
            return Ok(None);
        }

        let span = Span::new(
            code_start.line,
            code_start.col,
            code_end.line,
            code_end.col.saturating_sub(1).max(1),
        );
        Ok(Some(StringPart::Code {
            source: source.to_string(),
            span,
        }))
    }

    /// Skip a quoted string inside an embedded expression, escapes included.
    /// Stops at end of input; the enclosing segment reports that.
    fn skip_nested_string(&mut self) {
        self.advance(); // opening '"'
        while let Some(ch) = self.advance() {
            match ch {
                '"' => return,
                '\\' => {
                    self.advance();
                }
                _ => {}
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
