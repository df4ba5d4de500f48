//! # Lexiclass
//!
//! Supervised Naive Bayes text classification over a curated, per-class
//! keyword vocabulary.
//!
//! ## Features
//!
//! - Class priors and Laplace-smoothed keyword likelihoods from a labeled corpus
//! - Log-space scoring with deterministic tie-breaking
//! - Confusion matrices with accuracy, precision and recall
//! - Optional parallel training and evaluation passes
//! - Pluggable document stores behind the `DocumentCorpus` trait

pub mod classification;
pub mod cli;
pub mod corpus;
pub mod error;
mod parallel;

pub mod prelude {
    pub use crate::classification::{
        ClassRegistry, Classifier, ConfusionMatrix, Evaluator, KeywordCatalog, ProbabilityModel,
        Trainer,
    };
    pub use crate::corpus::{DocumentCorpus, JsonlCorpus, MemoryCorpus, TermBag};
    pub use crate::error::{LexiclassError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
