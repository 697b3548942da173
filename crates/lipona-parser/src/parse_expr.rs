//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest):
//! 4. `suli`, `lili`, `suli_sama`, `lili_sama`, `sama` (no chaining)
//! 3. `+`, `-`
//! 2. `*`, `/`
//! 1. unary `-`
//!
//! Calls bind tightest: `name(args)`.

use lipona_lexer::token::TokenKind;
use lipona_types::ast::*;
use lipona_types::ErrorCode;

use crate::embedded::parse_embedded_at_depth;
use crate::parser::{Parser, MAX_EXPR_DEPTH};

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.nested(Self::parse_comparison)
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_EXPR_DEPTH`].
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Option<Expr>) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}"),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = parse(self);
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `Comparison := Additive [ CompOp Additive ]`
    ///
    /// Comparison operators do NOT chain: `a lili b lili c` is a parse error.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_add()?;
        if let Some(op) = self.match_comparison_op() {
            self.advance(); // consume operator
            let right = self.parse_add()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
            // Reject chaining
            if self.match_comparison_op().is_some() {
                let span = self.current_span();
                self.error_with_suggestion(
                    ErrorCode::CHAINED_COMPARISON,
                    "comparison operators cannot be chained",
                    span,
                    "compare once and store the result, or nest the conditions",
                );
                // Skip the rest of the chain so it does not cascade.
                while self.match_comparison_op().is_some() {
                    self.advance();
                    self.parse_add()?;
                }
            }
        }
        Some(left)
    }

    /// Check if current token is a comparison operator, return corresponding BinOp.
    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::Suli => Some(BinOp::Greater),
            TokenKind::Lili => Some(BinOp::Less),
            TokenKind::SuliSama => Some(BinOp::GreaterEq),
            TokenKind::LiliSama => Some(BinOp::LessEq),
            TokenKind::Sama => Some(BinOp::Same),
            _ => None,
        }
    }

    /// `Additive := Multiplicative { ("+" | "-") Multiplicative }`
    fn parse_add(&mut self) -> Option<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `Multiplicative := Unary { ("*" | "/") Unary }`
    fn parse_mul(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `Unary := "-" Unary | Primary`
    fn parse_unary(&mut self) -> Option<Expr> {
        if self.check_exact(&TokenKind::Minus) {
            let start = self.advance().span;
            let operand = self.nested(Self::parse_unary)?;
            let span = start.merge(operand.span);
            return Some(Expr::new(ExprKind::Neg(Box::new(operand)), span));
        }
        self.parse_primary()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Number(n) => {
                self.advance();
                Some(Expr::new(ExprKind::Number(n), start))
            }
            TokenKind::String(parts) => {
                self.advance();
                self.check_embedded_parts(&parts);
                Some(Expr::new(ExprKind::String(parts), start))
            }
            TokenKind::Lon => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(true), start))
            }
            TokenKind::Ala => {
                self.advance();
                Some(Expr::new(ExprKind::Bool(false), start))
            }

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Some(Expr::new(inner.kind, span))
            }

            // ── Identifier or function call ─────────────────────────────
            TokenKind::Identifier(name) => {
                if *self.look_ahead(1) == TokenKind::LParen {
                    self.parse_call()
                } else {
                    self.advance();
                    Some(Expr::new(ExprKind::Var(name), start))
                }
            }

            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got {}", self.describe_current()),
                );
                None
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Call Parsing
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `name(args...)`.
    fn parse_call(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let args = self.parse_arg_list()?;
        self.expect(&TokenKind::RParen)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Call { name, args }, span))
    }

    /// Parse a comma-separated argument list (inside parens).
    fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            // Allow trailing comma before `)`
            if self.check_exact(&TokenKind::RParen) {
                break;
            }
        }
        Some(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // String Segments
    // ══════════════════════════════════════════════════════════════════════════

    /// Lex and parse every embedded expression so malformed ones are reported
    /// before anything runs. The segments stay as source text in the tree.
    fn check_embedded_parts(&mut self, parts: &[StringPart]) {
        for part in parts {
            let StringPart::Code { source, span } = part else {
                continue;
            };
            if let Err(errors) = parse_embedded_at_depth(source, self.expr_depth) {
                let Some(first) = errors.first() else {
                    continue;
                };
                // Too-deep nesting keeps its own code, however many strings down.
                let code = if first.code == ErrorCode::NESTING_TOO_DEEP {
                    ErrorCode::NESTING_TOO_DEEP
                } else {
                    ErrorCode::INVALID_INTERPOLATION
                };
                self.error_at(
                    code,
                    format!("invalid expression in string: {}", first.message),
                    first.span.offset_by(*span),
                );
            }
        }
    }
}
