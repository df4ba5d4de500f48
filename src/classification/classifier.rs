//! Scoring a term bag against every class.
//!
//! Scores are kept in log space: `log P(c) + sum log P(t | c)`. This ranks
//! classes exactly like the product of probabilities but does not underflow
//! on long documents. A class with a zero prior scores negative infinity.

use serde::{Deserialize, Serialize};

use crate::classification::model::ProbabilityModel;
use crate::classification::registry::ClassRegistry;
use crate::corpus::TermBag;
use crate::error::Result;

/// How a keyword that occurs several times in one document is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrencePolicy {
    /// Every occurrence contributes its probability once.
    #[default]
    PerOccurrence,
    /// Each distinct term contributes its probability once, however often it occurs.
    PerDistinctTerm,
}

/// Configuration for classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Counting of repeated keywords.
    pub occurrence_policy: OccurrencePolicy,
}

/// The outcome of classifying one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Index of the winning class.
    pub class_index: usize,
    /// Log-space score of the winning class.
    pub log_score: f64,
}

/// Naive Bayes classifier over a trained model.
///
/// Borrows the model and class list read-only, so one model can back any
/// number of classifiers on any number of threads.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    model: &'a ProbabilityModel,
    registry: &'a ClassRegistry,
    config: ClassifierConfig,
}

impl<'a> Classifier<'a> {
    /// Create a classifier with the default configuration.
    pub fn new(model: &'a ProbabilityModel, registry: &'a ClassRegistry) -> Result<Self> {
        Classifier::with_config(model, registry, ClassifierConfig::default())
    }

    /// Create a classifier with an explicit configuration.
    ///
    /// Fails if the model was trained for a different class list.
    pub fn with_config(
        model: &'a ProbabilityModel,
        registry: &'a ClassRegistry,
        config: ClassifierConfig,
    ) -> Result<Self> {
        model.check_registry(registry)?;
        Ok(Classifier {
            model,
            registry,
            config,
        })
    }

    /// Get the underlying model.
    pub fn model(&self) -> &'a ProbabilityModel {
        self.model
    }

    /// Get the class list.
    pub fn registry(&self) -> &'a ClassRegistry {
        self.registry
    }

    /// Get the classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Log-space score of every class, in class index order.
    ///
    /// Terms that are not model keywords are skipped.
    pub fn scores(&self, terms: &TermBag) -> Vec<f64> {
        let mut scores: Vec<f64> = self.model.priors().iter().map(|prior| prior.ln()).collect();

        for (term, count) in terms.iter() {
            let Some(probabilities) = self.model.conditionals_of(term) else {
                continue;
            };
            let weight = match self.config.occurrence_policy {
                OccurrencePolicy::PerOccurrence => count as f64,
                OccurrencePolicy::PerDistinctTerm => 1.0,
            };
            for (score, probability) in scores.iter_mut().zip(probabilities) {
                *score += weight * probability.ln();
            }
        }

        scores
    }

    /// Best class for `terms`; ties go to the lowest class index.
    pub fn predict(&self, terms: &TermBag) -> Prediction {
        let scores = self.scores(terms);
        let mut best = 0;
        for (class_index, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = class_index;
            }
        }
        Prediction {
            class_index: best,
            log_score: scores.get(best).copied().unwrap_or(f64::NEG_INFINITY),
        }
    }

    /// Label of the best class for `terms`.
    pub fn classify(&self, terms: &TermBag) -> &'a str {
        let registry: &'a ClassRegistry = self.registry;
        &registry.labels()[self.predict(terms).class_index]
    }
}

/// Classify `terms` with the default configuration.
pub fn classify<'a>(
    terms: &TermBag,
    model: &'a ProbabilityModel,
    registry: &'a ClassRegistry,
) -> Result<&'a str> {
    Ok(Classifier::new(model, registry)?.classify(terms))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::LexiclassError;

    fn fixture(priors: Vec<f64>, keywords: &[(&str, Vec<f64>)]) -> (ProbabilityModel, ClassRegistry) {
        let labels: Vec<String> = ["A", "B", "C"][..priors.len()]
            .iter()
            .map(|label| label.to_string())
            .collect();
        let conditionals: BTreeMap<String, Vec<f64>> = keywords
            .iter()
            .map(|(keyword, row)| (keyword.to_string(), row.clone()))
            .collect();
        let class_count = labels.len();
        let registry = ClassRegistry::new(labels.clone()).unwrap();
        let model = ProbabilityModel::from_parts(
            labels,
            priors,
            vec![1; class_count],
            vec![1; class_count],
            class_count as u64,
            1,
            conditionals,
        );
        (model, registry)
    }

    #[test]
    fn test_keyword_drives_prediction() {
        let (model, registry) = fixture(vec![0.5, 0.5], &[("x", vec![0.5, 0.2]), ("y", vec![1.0 / 6.0, 0.4])]);
        let classifier = Classifier::new(&model, &registry).unwrap();

        let scores = classifier.scores(&TermBag::from_occurrences(["x"]));
        assert!((scores[0].exp() - 0.25).abs() < 1e-12);
        assert!((scores[1].exp() - 0.1).abs() < 1e-12);
        assert_eq!(classifier.classify(&TermBag::from_occurrences(["x"])), "A");
        assert_eq!(classifier.classify(&TermBag::from_occurrences(["y"])), "B");
    }

    #[test]
    fn test_unknown_terms_fall_back_to_prior() {
        let (model, registry) = fixture(vec![0.25, 0.75], &[("x", vec![0.5, 0.2])]);
        let classifier = Classifier::new(&model, &registry).unwrap();
        assert_eq!(classifier.classify(&TermBag::from_occurrences(["q", "r"])), "B");
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let (model, registry) = fixture(vec![1.0 / 3.0; 3], &[("x", vec![0.5, 0.2, 0.1])]);
        let classifier = Classifier::new(&model, &registry).unwrap();
        let prediction = classifier.predict(&TermBag::from_occurrences(["nothing"]));
        assert_eq!(prediction.class_index, 0);
        assert_eq!(classifier.classify(&TermBag::new()), "A");
    }

    #[test]
    fn test_zero_prior_class_never_wins_over_positive_prior() {
        let (model, registry) = fixture(vec![0.0, 1.0], &[("x", vec![0.9, 0.01])]);
        let classifier = Classifier::new(&model, &registry).unwrap();
        assert_eq!(classifier.classify(&TermBag::from_occurrences(["x", "x", "x"])), "B");
    }

    #[test]
    fn test_repeated_keyword_policies_disagree() {
        let (model, registry) = fixture(vec![0.8, 0.2], &[("k", vec![0.1, 0.3])]);
        let repeated = TermBag::from_occurrences(["k", "k", "k"]);

        // 0.8 * 0.1^3 = 0.0008 < 0.2 * 0.3^3 = 0.0054
        let per_occurrence = Classifier::new(&model, &registry).unwrap();
        assert_eq!(per_occurrence.classify(&repeated), "B");

        // 0.8 * 0.1 = 0.08 > 0.2 * 0.3 = 0.06
        let per_distinct = Classifier::with_config(
            &model,
            &registry,
            ClassifierConfig {
                occurrence_policy: OccurrencePolicy::PerDistinctTerm,
            },
        )
        .unwrap();
        assert_eq!(per_distinct.classify(&repeated), "A");

        let single = TermBag::from_occurrences(["k"]);
        assert_eq!(per_occurrence.classify(&single), "A");
        assert_eq!(per_distinct.classify(&single), "A");
    }

    #[test]
    fn test_long_documents_do_not_underflow() {
        let (model, registry) = fixture(vec![0.5, 0.5], &[("x", vec![0.011, 0.01])]);
        let classifier = Classifier::new(&model, &registry).unwrap();
        let bag = TermBag::from_counts([("x", 1000)]);

        let scores = classifier.scores(&bag);
        assert!(scores.iter().all(|score| score.is_finite()));
        assert_eq!(classifier.classify(&bag), "A");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let (model, registry) = fixture(vec![0.4, 0.6], &[("x", vec![0.5, 0.2]), ("y", vec![0.1, 0.3])]);
        let bag = TermBag::from_occurrences(["x", "y", "y", "other"]);
        let first = classify(&bag, &model, &registry).unwrap();
        for _ in 0..10 {
            assert_eq!(classify(&bag, &model, &registry).unwrap(), first);
        }
    }

    #[test]
    fn test_registry_mismatch() {
        let (model, _) = fixture(vec![0.5, 0.5], &[]);
        let other = ClassRegistry::new(["A", "B", "C"]).unwrap();
        assert!(matches!(
            Classifier::new(&model, &other),
            Err(LexiclassError::Configuration(_))
        ));
    }
}
