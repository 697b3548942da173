//! Core parser infrastructure: token cursor, error reporting, helpers.

use lipona_lexer::token::{Token, TokenKind};
use lipona_types::ast::{Expr, Ident, Program};
use lipona_types::{Diagnostic, Diagnostics, ErrorCode, SourceFile, Span};

/// Maximum expression nesting depth (parentheses, call arguments, unary minus).
///
/// The budget is shared with expressions embedded in string literals, so a
/// string nested inside a string inside a string still counts every level.
pub const MAX_EXPR_DEPTH: u32 = 64;

/// Maximum block nesting depth (`open ... pini` inside `open ... pini`).
pub const MAX_BLOCK_DEPTH: u32 = 128;

/// The Lipona parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Collects errors and attempts recovery when possible.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Collected errors.
    errors: Diagnostics,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
    /// Current block nesting depth.
    pub(crate) block_depth: u32,
}

/// Result of parsing a program.
#[derive(Debug)]
pub struct ParseResult {
    /// The tree, present only when no errors were found.
    pub program: Option<Program>,
    pub errors: Diagnostics,
}

/// Result of parsing a standalone expression.
#[derive(Debug)]
pub struct ExprParseResult {
    pub expr: Option<Expr>,
    pub errors: Diagnostics,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        let mut tokens = tokens;
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, "", end));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: Diagnostics::empty(),
            expr_depth: 0,
            block_depth: 0,
        }
    }

    /// Start counting expression depth from `depth` instead of zero.
    pub(crate) fn with_expr_depth(mut self, depth: u32) -> Self {
        self.expr_depth = depth;
        self
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    ///
    /// The stream always ends with `Eof`, and the cursor never moves past it.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Current cursor position, for detecting statements that consumed nothing.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    /// Returns `true` if the cursor sits on `name jo`.
    pub(crate) fn at_assignment(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Identifier(_)) && *self.look_ahead(1) == TokenKind::Jo
    }

    /// Describe the current token for "got ..." messages.
    pub(crate) fn describe_current(&self) -> String {
        match self.peek_kind() {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::String(_) => "a string".to_string(),
            other => format!("'{other}'"),
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check_exact(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got {}", expected, self.describe_current()),
            );
            None
        }
    }

    /// Expect an identifier token. Reserved words get their own error code.
    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            kind if kind.is_keyword() => {
                self.error_with_suggestion(
                    ErrorCode::RESERVED_WORD,
                    format!("'{kind}' is a reserved word and cannot be used as a name"),
                    self.current_span(),
                    "choose a different name",
                );
                None
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got {}", self.describe_current()),
                );
                None
            }
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.diagnostic(code, message, span);
        self.errors.push(error);
    }

    /// Report an error with a fix suggestion.
    pub(crate) fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self.diagnostic(code, message, span).with_suggestion(suggestion);
        self.errors.push(error);
    }

    fn diagnostic(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> Diagnostic {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        Diagnostic::new(&self.source_file.name, code, message, span, source_line)
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens until we reach a synchronization point.
    /// Used after an error to resume at a known-good position.
    ///
    /// Blocks opened while skipping are skipped up to their own `pini`, so a
    /// broken header does not leave its body behind as stray statements.
    pub(crate) fn synchronize(&mut self) {
        let mut depth = 0u32;
        while !self.at_end() {
            match self.peek_kind() {
                TokenKind::Open => depth += 1,
                TokenKind::Pini if depth > 0 => depth -= 1,
                TokenKind::Pini => return,
                TokenKind::Wile | TokenKind::Ilo | TokenKind::Pana if depth == 0 => return,
                TokenKind::Identifier(_) if depth == 0 && *self.look_ahead(1) == TokenKind::Jo => {
                    return
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program` AST.
    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        tracing::trace!(
            file = %self.source_file.name,
            statements = program.body.stmts.len(),
            errors = self.errors.total_errors,
            "parsed program"
        );
        let program = if self.errors.has_errors() {
            None
        } else {
            Some(program)
        };
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    /// Parse the token stream as exactly one expression.
    ///
    /// Leftover tokens after the expression are an error.
    pub fn parse_standalone_expr(mut self) -> ExprParseResult {
        let expr = self.parse_expression();
        if expr.is_some() && !self.at_end() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("unexpected {} after expression", self.describe_current()),
            );
        }
        let expr = if self.errors.has_errors() { None } else { expr };
        ExprParseResult {
            expr,
            errors: self.errors,
        }
    }
}
