//! Cross-cutting error types for the RCT crates.
//!
//! Storage errors (`DatabaseError`) live in `rct-db`; HTTP mapping lives in
//! `rct-server`. This module holds errors raised by the pure domain rules.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors raised by domain rules in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A data-entry category slug that is not in the category table.
    #[error("Invalid data category specified: '{0}'")]
    UnknownCategory(String),

    /// An explicitly supplied participant identifier was rejected.
    #[error("Invalid participant identifier: {0}")]
    InvalidIdentifier(String),

    /// Form data failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}
