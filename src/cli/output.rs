//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::classification::ConfusionMatrix;
use crate::cli::args::{LexiclassArgs, OutputFormat};
use crate::error::Result;

/// Prior of one class in a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassPrior {
    pub class: String,
    pub documents: u64,
    pub prior: f64,
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub documents: u64,
    pub keywords: usize,
    pub vocabulary_size: usize,
    pub classes: Vec<ClassPrior>,
    pub duration_ms: u64,
}

/// Log-space score of one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassScore {
    pub class: String,
    pub log_score: f64,
}

/// Result structure for classifying a term bag.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted: String,
    pub scores: Vec<ClassScore>,
}

/// Precision and recall of one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: String,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
}

/// Result structure for evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub confusion_matrix: ConfusionMatrix,
    pub total: u64,
    pub correct: u64,
    pub accuracy: Option<f64>,
    pub per_class: Vec<ClassMetrics>,
    pub duration_ms: u64,
}

impl EvaluationResult {
    /// Collect the derived metrics of `matrix`.
    pub fn from_matrix(confusion_matrix: ConfusionMatrix, duration_ms: u64) -> Self {
        let per_class = confusion_matrix
            .classes()
            .iter()
            .enumerate()
            .map(|(class_index, class)| ClassMetrics {
                class: class.clone(),
                precision: confusion_matrix.precision(class_index),
                recall: confusion_matrix.recall(class_index),
            })
            .collect();
        EvaluationResult {
            total: confusion_matrix.total(),
            correct: confusion_matrix.correct(),
            accuracy: confusion_matrix.accuracy(),
            per_class,
            confusion_matrix,
            duration_ms,
        }
    }
}

/// Keywords of one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassKeywords {
    pub class: String,
    pub keywords: Option<Vec<String>>,
}

/// Result structure for inspecting configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectionResult {
    pub classes: Vec<ClassKeywords>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    /// Render the result as plain text.
    fn to_human(&self) -> String;
}

impl HumanOutput for TrainingResult {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Model: {}", self.model_path);
        let _ = writeln!(out, "Training documents: {}", self.documents);
        let _ = writeln!(out, "Keywords: {}", self.keywords);
        let _ = writeln!(out, "Vocabulary size: {}", self.vocabulary_size);
        let _ = writeln!(out);
        let _ = writeln!(out, "Class priors:");
        let _ = writeln!(out, "─────────────");
        for class in &self.classes {
            let _ = writeln!(
                out,
                "{}: {:.4} ({} documents)",
                class.class, class.prior, class.documents
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Training time: {}ms", self.duration_ms);
        out
    }
}

impl HumanOutput for ClassificationResult {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Predicted class: {}", self.predicted);
        let _ = writeln!(out);
        let _ = writeln!(out, "Log scores:");
        let _ = writeln!(out, "───────────");
        for score in &self.scores {
            let _ = writeln!(out, "{}: {:.6}", score.class, score.log_score);
        }
        out
    }
}

impl HumanOutput for EvaluationResult {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Confusion matrix (rows predicted, columns actual):");
        let _ = writeln!(out, "══════════════════════════════════════════════════");
        let _ = write!(out, "{}", self.confusion_matrix);
        let _ = writeln!(out);
        let _ = writeln!(out, "Documents: {}", self.total);
        let _ = writeln!(out, "Correct: {}", self.correct);
        let _ = writeln!(out, "Accuracy: {}", format_ratio(self.accuracy));
        let _ = writeln!(out);
        let _ = writeln!(out, "Per-class metrics:");
        let _ = writeln!(out, "──────────────────");
        for metrics in &self.per_class {
            let _ = writeln!(
                out,
                "{}: precision {}, recall {}",
                metrics.class,
                format_ratio(metrics.precision),
                format_ratio(metrics.recall)
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Evaluation time: {}ms", self.duration_ms);
        out
    }
}

impl HumanOutput for InspectionResult {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let labels: Vec<&str> = self.classes.iter().map(|c| c.class.as_str()).collect();
        let _ = writeln!(out, "Classes: [{}]", labels.join(", "));
        for class in &self.classes {
            if let Some(keywords) = &class.keywords {
                let _ = writeln!(out, "{}: [{}]", class.class, keywords.join(", "));
            }
        }
        out
    }
}

/// Render a result in the requested format.
pub fn format_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &LexiclassArgs,
) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => {
            let mut out = String::new();
            if args.verbosity() > 0 {
                let _ = writeln!(out, "{message}");
                let _ = writeln!(out);
            }
            out.push_str(&result.to_human());
            Ok(out)
        }
        OutputFormat::Json => {
            let mut json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            json.push('\n');
            Ok(json)
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &LexiclassArgs,
) -> Result<()> {
    print!("{}", format_result(message, result, args)?);
    Ok(())
}

/// Format an optional ratio as a percentage.
fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:.2}%", ratio * 100.0),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(format: &str) -> LexiclassArgs {
        LexiclassArgs::try_parse_from(["lexiclass", "-f", format, "inspect", "--classes", "c.txt"])
            .unwrap()
    }

    fn evaluation() -> EvaluationResult {
        let mut matrix = ConfusionMatrix::new(vec!["A".to_string(), "B".to_string()]);
        matrix.record(0, 0);
        matrix.record(1, 0);
        EvaluationResult::from_matrix(matrix, 3)
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(Some(0.5)), "50.00%");
        assert_eq!(format_ratio(Some(1.0 / 3.0)), "33.33%");
        assert_eq!(format_ratio(None), "n/a");
    }

    #[test]
    fn test_evaluation_metrics() {
        let result = evaluation();
        assert_eq!(result.total, 2);
        assert_eq!(result.correct, 1);
        assert_eq!(result.accuracy, Some(0.5));
        assert_eq!(result.per_class[0].recall, Some(0.5));
        assert_eq!(result.per_class[1].recall, None);
    }

    #[test]
    fn test_human_output() {
        let rendered = format_result("Evaluation complete", &evaluation(), &args("human")).unwrap();
        assert!(rendered.starts_with("Evaluation complete"));
        assert!(rendered.contains("Accuracy: 50.00%"));
        assert!(rendered.contains("B: precision 0.00%, recall n/a"));
    }

    #[test]
    fn test_json_output() {
        let rendered = format_result("Evaluation complete", &evaluation(), &args("json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["confusion_matrix"]["counts"][1][0], 1);
    }
}
