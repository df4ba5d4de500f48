//! Predicted-vs-actual count tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A square matrix of counts indexed `[predicted][actual]`.
///
/// Rows and columns follow the class order of the registry the matrix was
/// built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Create an all-zero matrix for `classes`.
    pub fn new(classes: Vec<String>) -> Self {
        let size = classes.len();
        ConfusionMatrix {
            classes,
            counts: vec![vec![0; size]; size],
        }
    }

    /// Class labels in row/column order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes (rows and columns).
    pub fn size(&self) -> usize {
        self.classes.len()
    }

    /// Count one document predicted as `predicted` whose true class is `actual`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn record(&mut self, predicted: usize, actual: usize) {
        self.counts[predicted][actual] += 1;
    }

    /// Count at `[predicted][actual]`, zero when out of range.
    pub fn get(&self, predicted: usize, actual: usize) -> u64 {
        self.counts
            .get(predicted)
            .and_then(|row| row.get(actual))
            .copied()
            .unwrap_or(0)
    }

    /// Rows of the matrix, one per predicted class.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Total number of recorded documents.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Number of documents on the diagonal.
    pub fn correct(&self) -> u64 {
        (0..self.size()).map(|i| self.counts[i][i]).sum()
    }

    /// Documents predicted as the class at `class_index` (row sum).
    pub fn predicted_count(&self, class_index: usize) -> u64 {
        self.counts
            .get(class_index)
            .map(|row| row.iter().sum())
            .unwrap_or(0)
    }

    /// Documents whose true class is the class at `class_index` (column sum).
    pub fn actual_count(&self, class_index: usize) -> u64 {
        self.counts
            .iter()
            .filter_map(|row| row.get(class_index))
            .sum()
    }

    /// Fraction of documents classified correctly, `None` for an empty matrix.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.correct(), self.total())
    }

    /// Precision of the class at `class_index`, `None` if it was never predicted.
    pub fn precision(&self, class_index: usize) -> Option<f64> {
        ratio(
            self.get(class_index, class_index),
            self.predicted_count(class_index),
        )
    }

    /// Recall of the class at `class_index`, `None` if it never occurs.
    pub fn recall(&self, class_index: usize) -> Option<f64> {
        ratio(
            self.get(class_index, class_index),
            self.actual_count(class_index),
        )
    }

    /// Add the counts of `other`, which must cover the same classes.
    pub fn merge(mut self, other: ConfusionMatrix) -> Self {
        debug_assert_eq!(self.classes, other.classes);
        for (row, other_row) in self.counts.iter_mut().zip(other.counts) {
            for (count, other_count) in row.iter_mut().zip(other_row) {
                *count += other_count;
            }
        }
        self
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

impl fmt::Display for ConfusionMatrix {
    /// Renders rows as predicted classes and columns as actual classes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .classes
            .iter()
            .map(|label| label.chars().count())
            .chain(std::iter::once("predicted\\actual".len()))
            .max()
            .unwrap_or(0);
        let cell_width = self
            .classes
            .iter()
            .map(|label| label.chars().count())
            .chain(self.counts.iter().flatten().map(|count| count.to_string().len()))
            .max()
            .unwrap_or(1);

        write!(f, "{:<label_width$}", "predicted\\actual")?;
        for label in &self.classes {
            write!(f, "  {label:>cell_width$}")?;
        }
        writeln!(f)?;

        for (label, row) in self.classes.iter().zip(&self.counts) {
            write!(f, "{label:<label_width$}")?;
            for count in row {
                write!(f, "  {count:>cell_width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
