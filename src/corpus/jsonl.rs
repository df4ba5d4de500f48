//! JSON Lines backed corpus.
//!
//! Each non-blank line holds one document:
//!
//! ```text
//! {"label": "Europe", "terms": ["paris", "seine", "paris"]}
//! {"label": "Asia", "terms": {"tokyo": 2, "edo": 1}}
//! ```
//!
//! `terms` is either a list of occurrences or an object mapping each distinct
//! term to its occurrence count.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::corpus::{DocId, DocumentCorpus, LabeledDocument, MemoryCorpus, TermBag};
use crate::error::{LexiclassError, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TermsField {
    Occurrences(Vec<String>),
    Counts(BTreeMap<String, u32>),
}

#[derive(Debug, Deserialize)]
struct JsonlRecord {
    label: String,
    terms: TermsField,
}

impl From<JsonlRecord> for LabeledDocument {
    fn from(record: JsonlRecord) -> Self {
        let terms = match record.terms {
            TermsField::Occurrences(occurrences) => TermBag::from_occurrences(occurrences),
            TermsField::Counts(counts) => TermBag::from_counts(counts),
        };
        LabeledDocument::new(record.label, terms)
    }
}

/// A corpus loaded from a JSON Lines file.
#[derive(Debug, Clone)]
pub struct JsonlCorpus {
    path: PathBuf,
    documents: MemoryCorpus,
}

impl JsonlCorpus {
    /// Open and load the corpus stored at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            LexiclassError::corpus_access(format!("cannot open corpus {}: {e}", path.display()))
        })?;
        let reader = BufReader::new(file);

        let mut documents = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                LexiclassError::corpus_access(format!(
                    "{}:{}: read failed: {e}",
                    path.display(),
                    line_num + 1
                ))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let record: JsonlRecord = serde_json::from_str(&line).map_err(|e| {
                LexiclassError::corpus_access(format!(
                    "{}:{}: malformed document: {e}",
                    path.display(),
                    line_num + 1
                ))
            })?;
            documents.push(LabeledDocument::from(record));
        }

        log::debug!(
            "Loaded {} documents from {}",
            documents.len(),
            path.display()
        );

        Ok(JsonlCorpus {
            path,
            documents: MemoryCorpus::from_documents(documents),
        })
    }

    /// Path the corpus was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loaded documents in file order.
    pub fn documents(&self) -> &[LabeledDocument] {
        self.documents.documents()
    }
}

impl DocumentCorpus for JsonlCorpus {
    fn document_count(&self) -> Result<usize> {
        self.documents.document_count()
    }

    fn terms_of(&self, doc_id: DocId) -> Result<TermBag> {
        self.documents.terms_of(doc_id)
    }

    fn label_of(&self, doc_id: DocId) -> Result<String> {
        self.documents.label_of(doc_id)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_corpus(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_both_term_shapes() {
        let file = write_corpus(
            "{\"label\": \"A\", \"terms\": [\"x\", \"x\", \"z\"]}\n\
             \n\
             {\"label\": \"B\", \"terms\": {\"y\": 1, \"z\": 3}}\n",
        );

        let corpus = JsonlCorpus::open(file.path()).unwrap();
        assert_eq!(corpus.document_count().unwrap(), 2);
        assert_eq!(corpus.label_of(0).unwrap(), "A");
        assert_eq!(corpus.terms_of(0).unwrap().frequency("x"), 2);
        assert_eq!(corpus.terms_of(1).unwrap().frequency("z"), 3);
    }

    #[test]
    fn test_missing_file_is_corpus_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonlCorpus::open(dir.path().join("missing.jsonl"));
        assert!(matches!(result, Err(LexiclassError::CorpusAccess(_))));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let file = write_corpus("{\"label\": \"A\", \"terms\": []}\n{\"terms\": []}\n");
        match JsonlCorpus::open(file.path()) {
            Err(LexiclassError::CorpusAccess(msg)) => assert!(msg.contains(":2:")),
            other => panic!("Expected corpus access error, got {other:?}"),
        }
    }
}
