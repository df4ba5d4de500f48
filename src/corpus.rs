//! Labeled document sources.
//!
//! A corpus exposes, per document, a [`TermBag`] and a ground-truth class
//! label. Training and evaluation only talk to the [`DocumentCorpus`] trait,
//! so any store that can answer these three questions can back them.

pub mod jsonl;
pub mod memory;
pub mod term_bag;

pub use jsonl::JsonlCorpus;
pub use memory::{LabeledDocument, MemoryCorpus};
pub use term_bag::TermBag;

use crate::error::Result;

/// Document identifier within a corpus: `0..document_count()`.
pub type DocId = usize;

/// A source of labeled documents.
///
/// Every call may fail with a corpus access error; callers surface such
/// failures immediately and never retry.
pub trait DocumentCorpus: Send + Sync + std::fmt::Debug {
    /// Number of documents in the corpus.
    fn document_count(&self) -> Result<usize>;

    /// Term bag of the given document.
    fn terms_of(&self, doc_id: DocId) -> Result<TermBag>;

    /// Ground-truth class label of the given document.
    fn label_of(&self, doc_id: DocId) -> Result<String>;
}
