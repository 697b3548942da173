//! Parsing of the `{expr}` segments embedded in string literals.

use lipona_lexer::Lexer;
use lipona_types::ast::Expr;
use lipona_types::{Diagnostics, SourceFile};

use crate::parser::Parser;

/// File name given to diagnostics raised inside an embedded expression.
pub const EMBEDDED_NAME: &str = "<embedded>";

/// Lex and parse the source of one embedded expression.
///
/// The segment must be exactly one expression. Spans in the result (and in
/// the errors) are relative to the segment; use
/// [`Span::offset_by`](lipona_types::Span::offset_by) to map them back into
/// the enclosing file.
pub fn parse_embedded_expr(source: &str) -> Result<Expr, Diagnostics> {
    parse_embedded_at_depth(source, 0)
}

/// Like [`parse_embedded_expr`], for a segment found `depth` expression
/// levels deep. Strings inside the segment keep counting from there.
pub(crate) fn parse_embedded_at_depth(source: &str, depth: u32) -> Result<Expr, Diagnostics> {
    let sf = SourceFile::new(EMBEDDED_NAME, source);
    let lexed = Lexer::new(&sf).lex();
    if lexed.errors.has_errors() {
        return Err(lexed.errors);
    }
    let parsed = Parser::new(lexed.tokens, &sf)
        .with_expr_depth(depth)
        .parse_standalone_expr();
    match parsed.expr {
        Some(expr) => Ok(expr),
        None => Err(parsed.errors),
    }
}
