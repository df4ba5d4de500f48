//! Error types for the Lexiclass library.
//!
//! All errors are represented by the [`LexiclassError`] enum. The three domain
//! failures of the classification pipeline are configuration problems, corpus
//! access failures and empty corpora; the remaining variants wrap I/O and
//! serialization errors from the surrounding plumbing.
//!
//! # Examples
//!
//! ```
//! use lexiclass::error::{LexiclassError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexiclassError::configuration("unknown class 'X'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lexiclass operations.
#[derive(Error, Debug)]
pub enum LexiclassError {
    /// Class or keyword configuration is inconsistent or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The document store cannot be opened or a document lookup failed.
    #[error("Corpus access error: {0}")]
    CorpusAccess(String),

    /// A computation needed a non-empty corpus.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LexiclassError.
pub type Result<T> = std::result::Result<T, LexiclassError>;

impl LexiclassError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        LexiclassError::Configuration(msg.into())
    }

    /// Create a new corpus access error.
    pub fn corpus_access<S: Into<String>>(msg: S) -> Self {
        LexiclassError::CorpusAccess(msg.into())
    }

    /// Create a new empty corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        LexiclassError::EmptyCorpus(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        LexiclassError::Other(format!("Internal error: {}", msg.into()))
    }
}
