//! Lipona parser: converts a token stream into an AST.

mod embedded;
mod parse_expr;
mod parse_stmt;
mod parser;

pub use embedded::{parse_embedded_expr, EMBEDDED_NAME};
pub use parser::{ExprParseResult, ParseResult, Parser, MAX_BLOCK_DEPTH, MAX_EXPR_DEPTH};
