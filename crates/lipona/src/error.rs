//! Top-level error type for running a Lipona program.

use lipona_eval::Pakala;
use lipona_types::{Diagnostics, ErrorCode};
use thiserror::Error;

/// Why a program did not run to completion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiponaError {
    /// The source could not be tokenized. Nothing ran.
    #[error("{0}")]
    Lex(Diagnostics),

    /// The source is not a valid program. Nothing ran.
    #[error("{0}")]
    Parse(Diagnostics),

    /// Execution halted on a fault.
    #[error(transparent)]
    Runtime(#[from] Pakala),
}

impl LiponaError {
    /// The structural diagnostics, if this is a lex or parse failure.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            LiponaError::Lex(d) | LiponaError::Parse(d) => Some(d),
            LiponaError::Runtime(_) => None,
        }
    }

    /// Codes of every stored diagnostic, in discovery order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.diagnostics()
            .map(|d| d.errors.iter().map(|e| e.code).collect())
            .unwrap_or_default()
    }

    /// Whether the program started running before it failed.
    pub fn is_runtime(&self) -> bool {
        matches!(self, LiponaError::Runtime(_))
    }
}
