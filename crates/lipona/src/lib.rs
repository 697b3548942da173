//! Lipona: runs a program end to end.
//!
//! ```text
//! Lipona Source → Lexer → Parser → Evaluator → output lines
//! ```
//!
//! Structural faults (lex and parse errors) stop the pipeline before anything
//! runs. A runtime fault halts execution; lines printed before it stay
//! printed.

mod error;
mod interpreter;

pub use error::LiponaError;
pub use interpreter::Interpreter;

pub use lipona_eval::{EvalConfig, Output, Pakala, StdoutOutput, Value, DEFAULT_MAX_CALL_DEPTH};
pub use lipona_types::{Diagnostic, Diagnostics, ErrorCode, SourceFile};

use lipona_eval::Evaluator;
use lipona_lexer::Lexer;
use lipona_parser::Parser;
use lipona_types::ast::Program;

/// Lex and parse a source file without running it.
pub fn parse_source(source_file: &SourceFile) -> Result<Program, LiponaError> {
    let lexed = Lexer::new(source_file).lex();
    tracing::debug!(
        file = %source_file.name,
        tokens = lexed.tokens.len(),
        errors = lexed.errors.total_errors,
        "lexed"
    );
    if lexed.errors.has_errors() {
        return Err(LiponaError::Lex(lexed.errors));
    }

    let parsed = Parser::new(lexed.tokens, source_file).parse();
    tracing::debug!(
        file = %source_file.name,
        errors = parsed.errors.total_errors,
        "parsed"
    );
    match parsed.program {
        Some(program) if !parsed.errors.has_errors() => Ok(program),
        _ => Err(LiponaError::Parse(parsed.errors)),
    }
}

/// Check a program for structural faults only.
pub fn check(name: &str, source: &str) -> Result<(), LiponaError> {
    parse_source(&SourceFile::new(name, source)).map(|_| ())
}

/// Run a program from memory, sending `toki` lines to `out`.
pub fn execute(source: &str, out: &mut dyn Output) -> Result<(), LiponaError> {
    execute_file_source(SourceFile::INLINE_NAME, source, out)
}

/// Run a program; diagnostics carry `name` as their file name.
pub fn execute_file_source(
    name: &str,
    source: &str,
    out: &mut dyn Output,
) -> Result<(), LiponaError> {
    execute_with_config(name, source, out, EvalConfig::default())
}

/// Run a program with explicit evaluator limits.
pub fn execute_with_config(
    name: &str,
    source: &str,
    out: &mut dyn Output,
    config: EvalConfig,
) -> Result<(), LiponaError> {
    let program = parse_source(&SourceFile::new(name, source))?;
    Evaluator::with_config(out, config).eval_program(&program)?;
    Ok(())
}

/// Run a program and capture its output lines, even when it faults.
pub fn run_to_lines(source: &str) -> (Vec<String>, Result<(), LiponaError>) {
    let mut lines: Vec<String> = Vec::new();
    let result = execute(source, &mut lines);
    (lines, result)
}
