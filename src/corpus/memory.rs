//! In-memory corpus implementation.

use serde::{Deserialize, Serialize};

use crate::corpus::{DocId, DocumentCorpus, TermBag};
use crate::error::{LexiclassError, Result};

/// A document together with its class label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledDocument {
    /// Ground-truth class label.
    pub label: String,
    /// Terms of the document.
    pub terms: TermBag,
}

impl LabeledDocument {
    /// Create a new labeled document.
    pub fn new<S: Into<String>>(label: S, terms: TermBag) -> Self {
        LabeledDocument {
            label: label.into(),
            terms,
        }
    }
}

/// A corpus held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    documents: Vec<LabeledDocument>,
}

impl MemoryCorpus {
    /// Create a new empty corpus.
    pub fn new() -> Self {
        MemoryCorpus {
            documents: Vec::new(),
        }
    }

    /// Create a corpus from existing documents, keeping their order.
    pub fn from_documents(documents: Vec<LabeledDocument>) -> Self {
        MemoryCorpus { documents }
    }

    /// Append a document and return its id.
    pub fn add_document<S: Into<String>>(&mut self, label: S, terms: TermBag) -> DocId {
        self.documents.push(LabeledDocument::new(label, terms));
        self.documents.len() - 1
    }

    /// All documents in id order.
    pub fn documents(&self) -> &[LabeledDocument] {
        &self.documents
    }

    /// Get the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn document(&self, doc_id: DocId) -> Result<&LabeledDocument> {
        self.documents.get(doc_id).ok_or_else(|| {
            LexiclassError::corpus_access(format!(
                "document {doc_id} out of range (corpus holds {} documents)",
                self.documents.len()
            ))
        })
    }
}

impl DocumentCorpus for MemoryCorpus {
    fn document_count(&self) -> Result<usize> {
        Ok(self.documents.len())
    }

    fn terms_of(&self, doc_id: DocId) -> Result<TermBag> {
        Ok(self.document(doc_id)?.terms.clone())
    }

    fn label_of(&self, doc_id: DocId) -> Result<String> {
        Ok(self.document(doc_id)?.label.clone())
    }
}

impl FromIterator<LabeledDocument> for MemoryCorpus {
    fn from_iter<I: IntoIterator<Item = LabeledDocument>>(iter: I) -> Self {
        MemoryCorpus::from_documents(iter.into_iter().collect())
    }
}
