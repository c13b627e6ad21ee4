//! Framework error type.
//!
//! Sub-crates define their own error enums (`RosterError`, `SimError`) and
//! either convert into `TaxiError` via `From` impls or stay separate; both
//! patterns are acceptable — prefer whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `taxi-core`.
#[derive(Debug, Error)]
pub enum TaxiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `taxi-*` crates.
pub type TaxiResult<T> = Result<T, TaxiError>;
