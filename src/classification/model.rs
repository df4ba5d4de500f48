//! Trained class priors and smoothed keyword likelihoods.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::registry::ClassRegistry;
use crate::error::{LexiclassError, Result};

/// A trained Naive Bayes model.
///
/// Holds `P(class)` for every class and `P(keyword | class)` for every catalog
/// keyword under every class, together with the counts they were derived
/// from. Per-class arrays are indexed in the order of [`classes`](Self::classes).
///
/// The model is immutable once built; classification only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityModel {
    classes: Vec<String>,
    class_priors: Vec<f64>,
    class_document_counts: Vec<u64>,
    class_word_totals: Vec<u64>,
    document_count: u64,
    vocabulary_size: usize,
    conditionals: BTreeMap<String, Vec<f64>>,
}

impl ProbabilityModel {
    pub(crate) fn from_parts(
        classes: Vec<String>,
        class_priors: Vec<f64>,
        class_document_counts: Vec<u64>,
        class_word_totals: Vec<u64>,
        document_count: u64,
        vocabulary_size: usize,
        conditionals: BTreeMap<String, Vec<f64>>,
    ) -> Self {
        ProbabilityModel {
            classes,
            class_priors,
            class_document_counts,
            class_word_totals,
            document_count,
            vocabulary_size,
            conditionals,
        }
    }

    /// Class labels the model was trained for, in index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Get the number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// `P(class)` for every class.
    pub fn priors(&self) -> &[f64] {
        &self.class_priors
    }

    /// `P(class)` for the class at `class_index`.
    pub fn prior(&self, class_index: usize) -> Option<f64> {
        self.class_priors.get(class_index).copied()
    }

    /// `P(keyword | class)`, or `None` when the keyword is not a model feature.
    pub fn conditional(&self, keyword: &str, class_index: usize) -> Option<f64> {
        self.conditionals
            .get(keyword)
            .and_then(|row| row.get(class_index).copied())
    }

    /// `P(keyword | class)` for every class.
    pub fn conditionals_of(&self, keyword: &str) -> Option<&[f64]> {
        self.conditionals.get(keyword).map(|row| row.as_slice())
    }

    /// Check whether `keyword` is a model feature.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.conditionals.contains_key(keyword)
    }

    /// Feature keywords in lexicographic order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.conditionals.keys().map(|keyword| keyword.as_str())
    }

    /// Get the number of feature keywords.
    pub fn keyword_count(&self) -> usize {
        self.conditionals.len()
    }

    /// Number of distinct digit-free terms seen during training.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Number of training documents.
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// Training documents labeled with the class at `class_index`.
    pub fn class_document_count(&self, class_index: usize) -> Option<u64> {
        self.class_document_counts.get(class_index).copied()
    }

    /// Digit-free term occurrences in training documents of the class at `class_index`.
    pub fn class_word_total(&self, class_index: usize) -> Option<u64> {
        self.class_word_totals.get(class_index).copied()
    }

    /// Check that the model was trained for exactly the classes of `registry`, in order.
    pub fn check_registry(&self, registry: &ClassRegistry) -> Result<()> {
        if self.classes.as_slice() != registry.labels() {
            return Err(LexiclassError::configuration(format!(
                "model classes {:?} do not match class list {:?}",
                self.classes,
                registry.labels()
            )));
        }
        Ok(())
    }

    /// Write the model as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a model written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let model: ProbabilityModel = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let class_count = self.classes.len();
        if class_count == 0 {
            return Err(LexiclassError::configuration("model has no classes"));
        }
        let per_class = [
            ("class priors", self.class_priors.len()),
            ("class document counts", self.class_document_counts.len()),
            ("class word totals", self.class_word_totals.len()),
        ];
        for (name, len) in per_class {
            if len != class_count {
                return Err(LexiclassError::configuration(format!(
                    "model has {len} {name} for {class_count} classes"
                )));
            }
        }
        for (label, &prior) in self.classes.iter().zip(&self.class_priors) {
            if !is_probability(prior) {
                return Err(LexiclassError::configuration(format!(
                    "model prior {prior} of class '{label}' is outside (0, 1]"
                )));
            }
        }
        for (keyword, row) in &self.conditionals {
            if row.len() != class_count {
                return Err(LexiclassError::configuration(format!(
                    "model keyword '{keyword}' has {} probabilities for {class_count} classes",
                    row.len()
                )));
            }
            for (label, &probability) in self.classes.iter().zip(row) {
                if !is_probability(probability) {
                    return Err(LexiclassError::configuration(format!(
                        "model probability {probability} of '{keyword}' under class '{label}' \
                         is outside (0, 1]"
                    )));
                }
            }
        }
        Ok(())
    }
}

// NaN fails both comparisons.
fn is_probability(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> ProbabilityModel {
        let mut conditionals = BTreeMap::new();
        conditionals.insert("x".to_string(), vec![0.5, 0.2]);
        conditionals.insert("y".to_string(), vec![1.0 / 6.0, 0.4]);
        ProbabilityModel::from_parts(
            vec!["A".to_string(), "B".to_string()],
            vec![0.5, 0.5],
            vec![1, 1],
            vec![3, 2],
            2,
            3,
            conditionals,
        )
    }

    #[test]
    fn test_accessors() {
        let model = sample_model();
        assert_eq!(model.class_count(), 2);
        assert_eq!(model.prior(0), Some(0.5));
        assert_eq!(model.prior(2), None);
        assert_eq!(model.conditional("x", 1), Some(0.2));
        assert_eq!(model.conditional("z", 0), None);
        assert!(model.has_keyword("y"));
        assert_eq!(model.keywords().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(model.class_word_total(0), Some(3));
        assert_eq!(model.vocabulary_size(), 3);
    }

    #[test]
    fn test_check_registry() {
        let model = sample_model();
        assert!(model.check_registry(&ClassRegistry::new(["A", "B"]).unwrap()).is_ok());
        assert!(matches!(
            model.check_registry(&ClassRegistry::new(["B", "A"]).unwrap()),
            Err(LexiclassError::Configuration(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = sample_model();

        model.save(&path).unwrap();
        let loaded = ProbabilityModel::load(&path).unwrap();

        assert_eq!(loaded.classes(), model.classes());
        assert_eq!(loaded.vocabulary_size(), 3);
        for keyword in ["x", "y"] {
            for class_index in 0..2 {
                let expected = model.conditional(keyword, class_index).unwrap();
                let actual = loaded.conditional(keyword, class_index).unwrap();
                assert!((expected - actual).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_load_rejects_inconsistent_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"classes":["A","B"],"class_priors":[1.0],"class_document_counts":[1,0],
               "class_word_totals":[1,0],"document_count":1,"vocabulary_size":1,"conditionals":{}}"#,
        )
        .unwrap();
        assert!(matches!(
            ProbabilityModel::load(&path),
            Err(LexiclassError::Configuration(_))
        ));
    }

    #[test]
    fn test_load_rejects_out_of_range_probabilities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model_json = |priors: &str, x_row: &str| {
            format!(
                r#"{{"classes":["A","B"],"class_priors":{priors},"class_document_counts":[1,1],
                   "class_word_totals":[3,2],"document_count":2,"vocabulary_size":3,
                   "conditionals":{{"x":{x_row}}}}}"#
            )
        };

        std::fs::write(&path, model_json("[0.5,0.5]", "[0.5,0.2]")).unwrap();
        assert!(ProbabilityModel::load(&path).is_ok());

        for (priors, x_row) in [
            ("[1.5,-0.5]", "[0.5,0.2]"),
            ("[0.0,1.0]", "[0.5,0.2]"),
            ("[0.5,0.5]", "[1.2,0.2]"),
            ("[0.5,0.5]", "[0.5,0.0]"),
            ("[0.5,0.5]", "[0.5,-0.1]"),
        ] {
            std::fs::write(&path, model_json(priors, x_row)).unwrap();
            match ProbabilityModel::load(&path) {
                Err(LexiclassError::Configuration(msg)) => assert!(msg.contains("(0, 1]")),
                other => panic!("Expected configuration error for {priors} {x_row}, got {other:?}"),
            }
        }
    }
}
