//! Statement parsing.

use std::rc::Rc;

use crate::parser::{Parser, MAX_BLOCK_DEPTH};
use lipona_lexer::token::TokenKind;
use lipona_types::ast::*;
use lipona_types::ErrorCode;

impl<'src> Parser<'src> {
    /// `Program := Stmt*`
    pub(crate) fn parse_program(&mut self) -> Program {
        let start = self.current_span();
        let mut stmts = Vec::new();
        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            self.parse_statement_into(&mut stmts);
        }
        let span = start.merge(self.previous_span());
        Program {
            body: Block { stmts, span },
        }
    }

    /// Parse one statement, recovering on failure.
    fn parse_statement_into(&mut self, stmts: &mut Vec<Stmt>) {
        let before = self.position();
        if let Some(stmt) = self.parse_statement() {
            stmts.push(stmt);
        } else {
            // Always make progress, even when nothing was consumed.
            if self.position() == before {
                self.advance();
            }
            self.synchronize();
        }
    }

    /// Parse a block of statements: `open stmts... pini`
    ///
    /// A block nested past [`MAX_BLOCK_DEPTH`] is reported without consuming
    /// `open`; recovery then skips it up to its matching `pini`.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        if self.block_depth >= MAX_BLOCK_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum block nesting depth is {MAX_BLOCK_DEPTH}"),
            );
            return None;
        }
        self.block_depth += 1;
        let block = self.parse_block_body();
        self.block_depth -= 1;
        block
    }

    fn parse_block_body(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::Open)?;
        let mut stmts = Vec::new();
        while !self.check_exact(&TokenKind::Pini) && !self.at_end() {
            if self.too_many_errors() {
                return None;
            }
            self.parse_statement_into(&mut stmts);
        }
        if self.at_end() {
            self.error_with_suggestion(
                ErrorCode::UNCLOSED_BLOCK,
                format!(
                    "expected 'pini' to close the block opened at line {}, got end of input",
                    start.start_line
                ),
                self.current_span(),
                "add 'pini' at the end of the block",
            );
            return None;
        }
        self.advance(); // eat `pini`
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Wile => self.parse_while_stmt(),
            TokenKind::Ilo => self.parse_func_def(),
            TokenKind::Pana => self.parse_return_stmt(),
            TokenKind::Identifier(_) if *self.look_ahead(1) == TokenKind::Jo => {
                self.parse_assign_stmt()
            }
            kind if kind.is_keyword() && *self.look_ahead(1) == TokenKind::Jo => {
                self.expect_identifier();
                None
            }
            TokenKind::Pini => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "unexpected 'pini' with no open block",
                );
                None
            }
            TokenKind::Taso => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "'taso' must directly follow the 'pini' of a condition block",
                );
                None
            }
            _ => {
                let expr = self.parse_expression()?;
                if self.check_exact(&TokenKind::La) {
                    self.parse_if_tail(expr)
                } else {
                    Some(Stmt::Expr(expr))
                }
            }
        }
    }

    /// `x jo expr`
    fn parse_assign_stmt(&mut self) -> Option<Stmt> {
        let target = self.expect_identifier()?;
        self.advance(); // eat `jo`
        let value = self.parse_expression()?;
        let span = target.span.merge(value.span);
        Some(Stmt::Assign(AssignStmt {
            target,
            value,
            span,
        }))
    }

    /// `la open ... pini [taso open ... pini]`, after the condition.
    fn parse_if_tail(&mut self, condition: Expr) -> Option<Stmt> {
        self.advance(); // eat `la`
        let then_block = self.parse_block()?;
        let else_block = if self.eat(&TokenKind::Taso) {
            Some(self.parse_block()?)
        } else {
            None
        };
        let span = condition.span.merge(self.previous_span());
        Some(Stmt::If(IfStmt {
            condition,
            then_block,
            else_block,
            span,
        }))
    }

    /// `wile cond la open ... pini`
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `wile`
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::La)?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    /// `ilo name (a, b) open ... pini`
    fn parse_func_def(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `ilo`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(Stmt::FuncDef(Rc::new(FuncDef {
            name,
            params,
            body,
            span,
        })))
    }

    /// Parse a comma-separated parameter list (inside parens).
    fn parse_param_list(&mut self) -> Option<Vec<Ident>> {
        let mut params: Vec<Ident> = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Some(params);
        }
        loop {
            let param = self.expect_identifier()?;
            if params.iter().any(|p| p.name == param.name) {
                self.error_at(
                    ErrorCode::DUPLICATE_PARAMETER,
                    format!("duplicate parameter '{}'", param.name),
                    param.span,
                );
            }
            params.push(param);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            // Trailing comma
            if self.check_exact(&TokenKind::RParen) {
                break;
            }
        }
        Some(params)
    }

    /// `pana [expr]`
    ///
    /// The value is only taken from the same source line, and never when the
    /// next statement is an assignment.
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let keyword = self.advance().span; // eat `pana`
        let next = self.peek();
        let has_value = next.kind.starts_expression()
            && next.span.start_line == keyword.end_line
            && !self.at_assignment();
        let value = if has_value {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let span = value.as_ref().map_or(keyword, |v| keyword.merge(v.span));
        Some(Stmt::Return(ReturnStmt { value, span }))
    }
}
