//! Per-class keyword lists used as classification features.

use std::fs;
use std::path::Path;

use ahash::{AHashMap, AHashSet};

use crate::classification::registry::ClassRegistry;
use crate::error::{LexiclassError, Result};

/// Maps each class label to the keywords scored for it.
///
/// Keyword lists keep their configured order and are not de-duplicated; the
/// same keyword may be listed under several classes.
#[derive(Debug, Clone, Default)]
pub struct KeywordCatalog {
    entries: Vec<(String, Vec<String>)>,
    index: AHashMap<String, usize>,
}

impl KeywordCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        KeywordCatalog {
            entries: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Add the keyword list of a class. A class may only be added once.
    pub fn insert<S, I, K>(&mut self, label: S, keywords: I) -> Result<()>
    where
        S: Into<String>,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let label = label.into();
        if label.is_empty() {
            return Err(LexiclassError::configuration("empty class label in keyword catalog"));
        }
        if self.index.contains_key(&label) {
            return Err(LexiclassError::configuration(format!(
                "class '{label}' appears more than once in the keyword catalog"
            )));
        }
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.iter().any(|keyword| keyword.is_empty()) {
            return Err(LexiclassError::configuration(format!(
                "empty keyword for class '{label}'"
            )));
        }
        self.index.insert(label.clone(), self.entries.len());
        self.entries.push((label, keywords));
        Ok(())
    }

    /// Parse a tab-separated catalog: `label<TAB>keyword<TAB>keyword...` per line.
    ///
    /// Blank lines are skipped. Empty fields (including a trailing tab) are
    /// rejected with the offending line number.
    pub fn parse(text: &str) -> Result<Self> {
        let mut catalog = KeywordCatalog::new();
        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let label = fields.next().unwrap_or_default();
            if label.is_empty() {
                return Err(LexiclassError::configuration(format!(
                    "keyword catalog line {}: missing class label",
                    line_num + 1
                )));
            }
            let keywords: Vec<&str> = fields.collect();
            if keywords.iter().any(|keyword| keyword.is_empty()) {
                return Err(LexiclassError::configuration(format!(
                    "keyword catalog line {}: empty keyword field for class '{label}'",
                    line_num + 1
                )));
            }

            catalog.insert(label, keywords).map_err(|e| match e {
                LexiclassError::Configuration(msg) => LexiclassError::configuration(format!(
                    "keyword catalog line {}: {msg}",
                    line_num + 1
                )),
                other => other,
            })?;
        }
        Ok(catalog)
    }

    /// Load a keyword catalog file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        KeywordCatalog::parse(&text)
    }

    /// Keywords configured for `label`.
    pub fn keywords_of(&self, label: &str) -> Option<&[String]> {
        self.index
            .get(label)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Iterate over `(label, keywords)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(label, keywords)| (label.as_str(), keywords.as_slice()))
    }

    /// Get the number of classes with a keyword list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the catalog against a class list.
    ///
    /// Every catalog class must be registered and every registered class must
    /// have a catalog entry (possibly with no keywords).
    pub fn validate(&self, registry: &ClassRegistry) -> Result<()> {
        for (label, _) in &self.entries {
            if !registry.contains(label) {
                return Err(LexiclassError::configuration(format!(
                    "keyword catalog references class '{label}' which is not in the class list"
                )));
            }
        }
        for label in registry.labels() {
            if !self.index.contains_key(label) {
                return Err(LexiclassError::configuration(format!(
                    "class '{label}' has no keyword catalog entry"
                )));
            }
        }
        Ok(())
    }

    /// Distinct keywords of the whole catalog, in first-seen order.
    pub fn distinct_keywords(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.entries
            .iter()
            .flat_map(|(_, keywords)| keywords.iter())
            .filter(|keyword| seen.insert(keyword.as_str()))
            .map(|keyword| keyword.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let catalog = KeywordCatalog::parse("A\tx\tw\nB\ty\tx\n\nC\n").unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.keywords_of("A").unwrap(), &["x", "w"]);
        assert_eq!(catalog.keywords_of("C").unwrap().len(), 0);
        assert_eq!(catalog.distinct_keywords(), vec!["x", "w", "y"]);
    }

    #[test]
    fn test_duplicates_within_class_are_kept() {
        let catalog = KeywordCatalog::parse("A\tx\tx\n").unwrap();
        assert_eq!(catalog.keywords_of("A").unwrap(), &["x", "x"]);
    }

    #[test]
    fn test_trailing_tab_is_configuration_error() {
        match KeywordCatalog::parse("A\tx\nB\ty\t\n") {
            Err(LexiclassError::Configuration(msg)) => assert!(msg.contains("line 2")),
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_middle_field_and_label() {
        assert!(KeywordCatalog::parse("A\tx\t\ty\n").is_err());
        assert!(KeywordCatalog::parse("\tx\n").is_err());
    }

    #[test]
    fn test_duplicate_class_line() {
        match KeywordCatalog::parse("A\tx\nA\ty\n") {
            Err(LexiclassError::Configuration(msg)) => assert!(msg.contains("line 2")),
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_against_registry() {
        let registry = ClassRegistry::new(["A", "B"]).unwrap();

        let catalog = KeywordCatalog::parse("A\tx\nB\ty\n").unwrap();
        assert!(catalog.validate(&registry).is_ok());

        let unknown = KeywordCatalog::parse("A\tx\nB\ty\nC\tz\n").unwrap();
        assert!(matches!(
            unknown.validate(&registry),
            Err(LexiclassError::Configuration(_))
        ));

        let missing = KeywordCatalog::parse("A\tx\n").unwrap();
        assert!(matches!(
            missing.validate(&registry),
            Err(LexiclassError::Configuration(_))
        ));
    }
}
