//! Term bags: the distinct terms of one document with their occurrence counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The terms of a single document.
///
/// A bag maps every distinct term to the number of times it occurs, which is
/// the shape a term-vector index hands out per document. Terms are kept in
/// lexicographic order so iteration (and therefore floating-point summation
/// during scoring) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct TermBag {
    terms: BTreeMap<String, u32>,
}

impl TermBag {
    /// Create an empty term bag.
    pub fn new() -> Self {
        TermBag {
            terms: BTreeMap::new(),
        }
    }

    /// Build a bag from a sequence of occurrences; repeated terms are counted.
    pub fn from_occurrences<I, S>(occurrences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut bag = TermBag::new();
        for term in occurrences {
            bag.add(term);
        }
        bag
    }

    /// Build a bag from explicit `(term, count)` pairs.
    ///
    /// Zero counts are dropped and counts for repeated terms are summed.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut bag = TermBag::new();
        for (term, count) in counts {
            bag.add_count(term, count);
        }
        bag
    }

    /// Record one occurrence of `term`.
    pub fn add<S: Into<String>>(&mut self, term: S) {
        self.add_count(term, 1);
    }

    /// Record `count` occurrences of `term`.
    pub fn add_count<S: Into<String>>(&mut self, term: S, count: u32) {
        if count == 0 {
            return;
        }
        *self.terms.entry(term.into()).or_insert(0) += count;
    }

    /// Occurrence count of `term`, zero when the term is absent.
    pub fn frequency(&self, term: &str) -> u32 {
        self.terms.get(term).copied().unwrap_or(0)
    }

    /// Check whether the bag contains `term`.
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Iterate over `(term, count)` pairs in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.terms.iter().map(|(term, count)| (term.as_str(), *count))
    }

    /// Number of distinct terms.
    pub fn distinct_terms(&self) -> usize {
        self.terms.len()
    }

    /// Total number of occurrences over all terms.
    pub fn total_occurrences(&self) -> u64 {
        self.terms.values().map(|&count| count as u64).sum()
    }

    /// Check if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<BTreeMap<String, u32>> for TermBag {
    fn from(counts: BTreeMap<String, u32>) -> Self {
        TermBag::from_counts(counts)
    }
}

impl From<TermBag> for BTreeMap<String, u32> {
    fn from(bag: TermBag) -> Self {
        bag.terms
    }
}

impl<S: Into<String>> FromIterator<S> for TermBag {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TermBag::from_occurrences(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_occurrences_counts_repeats() {
        let bag = TermBag::from_occurrences(["x", "x", "z"]);
        assert_eq!(bag.frequency("x"), 2);
        assert_eq!(bag.frequency("z"), 1);
        assert_eq!(bag.frequency("y"), 0);
        assert_eq!(bag.distinct_terms(), 2);
        assert_eq!(bag.total_occurrences(), 3);
    }

    #[test]
    fn test_from_counts_skips_zero_and_sums() {
        let bag = TermBag::from_counts([("a", 2), ("b", 0), ("a", 3)]);
        assert_eq!(bag.frequency("a"), 5);
        assert!(!bag.contains("b"));
        assert_eq!(bag.distinct_terms(), 1);
    }

    #[test]
    fn test_deserialize_drops_zero_counts() {
        let bag: TermBag = serde_json::from_str(r#"{"x":0,"y":2}"#).unwrap();
        assert!(!bag.contains("x"));
        assert_eq!(bag.frequency("y"), 2);
        assert_eq!(bag.distinct_terms(), 1);

        assert_eq!(serde_json::to_string(&bag).unwrap(), r#"{"y":2}"#);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let bag: TermBag = ["pear", "apple", "fig", "apple"].into_iter().collect();
        let terms: Vec<(&str, u32)> = bag.iter().collect();
        assert_eq!(terms, vec![("apple", 2), ("fig", 1), ("pear", 1)]);
    }

    #[test]
    fn test_empty_bag() {
        let bag = TermBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.total_occurrences(), 0);
    }
}
