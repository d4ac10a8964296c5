//! Error types and result definitions.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DictError>;

/// Errors produced while loading schema documents or rendering a table.
///
/// Unresolvable `$ref`s are deliberately absent: they degrade to "not
/// expanded" and never abort a load.
#[derive(Error, Debug)]
pub enum DictError {
    /// An input was not syntactically valid JSON.
    #[error("failed to parse schema `{name}`: {source}")]
    Parse {
        /// Source name of the offending input.
        name: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// An input parsed, but its top level is not a JSON object.
    #[error("schema `{name}` is not a JSON object")]
    NotAnObject {
        /// Source name of the offending input.
        name: String,
    },

    /// CSV rendering failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing rendered output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
