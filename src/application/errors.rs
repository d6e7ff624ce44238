//! Application-level error types

use thiserror::Error;

use crate::symbols::SymbolError;

/// Errors surfaced by the application use cases.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Reading or writing files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The universe snapshot could not be parsed.
    #[error("symbol universe error: {0}")]
    Symbol(#[from] SymbolError),

    /// Writing generated artifacts failed.
    #[error("output error: {0}")]
    Output(String),

    /// Validation reported errors, so nothing was generated.
    #[error("validation failed with {0} error(s)")]
    Validation(usize),
}
