//! Ordered set of class labels.

use std::fs;
use std::path::Path;

use ahash::AHashMap;

use crate::error::{LexiclassError, Result};

/// The fixed, ordered set of classes a document can be assigned to.
///
/// Insertion order defines each class's index, which in turn addresses rows
/// and columns of confusion matrices and per-class arrays in the model.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    labels: Vec<String>,
    index: AHashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a registry from labels in index order.
    ///
    /// Fails on an empty list, an empty label or a duplicate label.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = ClassRegistry {
            labels: Vec::new(),
            index: AHashMap::new(),
        };
        for label in labels {
            registry.push(label.into())?;
        }
        if registry.labels.is_empty() {
            return Err(LexiclassError::configuration("class list is empty"));
        }
        Ok(registry)
    }

    fn push(&mut self, label: String) -> Result<()> {
        if label.is_empty() {
            return Err(LexiclassError::configuration(format!(
                "empty class label at index {}",
                self.labels.len()
            )));
        }
        if self.index.contains_key(&label) {
            return Err(LexiclassError::configuration(format!(
                "duplicate class label '{label}'"
            )));
        }
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
        Ok(())
    }

    /// Parse a class list: a count `N` on the first line, then `N` labels.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

        let header = lines
            .next()
            .ok_or_else(|| LexiclassError::configuration("class list is empty"))?;
        let count: usize = header.trim().parse().map_err(|_| {
            LexiclassError::configuration(format!(
                "class list must start with a class count, found '{header}'"
            ))
        })?;

        let labels: Vec<&str> = lines.by_ref().take(count).collect();
        if labels.len() != count {
            return Err(LexiclassError::configuration(format!(
                "class list declares {count} classes but lists {}",
                labels.len()
            )));
        }
        if let Some(extra) = lines.find(|line| !line.trim().is_empty()) {
            return Err(LexiclassError::configuration(format!(
                "class list declares {count} classes but has an extra line '{extra}'"
            )));
        }

        ClassRegistry::new(labels)
    }

    /// Load a class list file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        ClassRegistry::parse(&text)
    }

    /// Get the number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|label| label.as_str())
    }

    /// Index of `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Index of `label`, or a configuration error naming it.
    pub fn require_index(&self, label: &str) -> Result<usize> {
        self.index_of(label).ok_or_else(|| {
            LexiclassError::configuration(format!("class '{label}' is not in the class list"))
        })
    }

    /// Check whether `label` is a known class.
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }
}

impl PartialEq for ClassRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl Eq for ClassRegistry {}
