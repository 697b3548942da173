//! Shared types for Lipona.
//!
//! This crate defines the AST node types, source spans and the structured
//! diagnostics produced by the lexer and parser.

mod error;
mod span;
pub mod ast;

pub use error::{Diagnostic, Diagnostics, ErrorCategory, ErrorCode, MAX_ERRORS};
pub use span::{SourceFile, Span};
