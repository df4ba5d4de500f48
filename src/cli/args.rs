//! Command line argument parsing for the Lexiclass CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::classification::{ClassifierConfig, EvaluatorConfig, OccurrencePolicy, TrainerConfig};

/// Lexiclass - keyword-restricted Naive Bayes text classification
#[derive(Parser, Debug, Clone)]
#[command(name = "lexiclass")]
#[command(about = "Train and evaluate keyword-restricted Naive Bayes text classifiers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexiclassArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexiclassArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a labeled corpus
    Train(TrainArgs),

    /// Classify a single bag of terms
    Classify(ClassifyArgs),

    /// Evaluate a model against a labeled corpus
    Evaluate(EvaluateArgs),

    /// List classes and their keywords
    Inspect(InspectArgs),
}

/// Thread pool options shared by the corpus passes
#[derive(Args, Debug, Clone, Default)]
pub struct ParallelArgs {
    /// Process documents on a thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Number of worker threads (default: one per CPU core)
    #[arg(short, long, requires = "parallel")]
    pub threads: Option<usize>,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Class list file (count on the first line, then one label per line)
    #[arg(short, long, value_name = "CLASSES_FILE")]
    pub classes: PathBuf,

    /// Keyword catalog file (tab-separated: label, keywords...)
    #[arg(short, long, value_name = "KEYWORDS_FILE")]
    pub keywords: PathBuf,

    /// Training corpus (JSON Lines)
    #[arg(value_name = "CORPUS_FILE")]
    pub corpus: PathBuf,

    /// Where to write the trained model
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "model.json")]
    pub output: PathBuf,

    #[command(flatten)]
    pub parallel: ParallelArgs,
}

/// Arguments for classifying a term bag
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Trained model file
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Term occurrences of the document
    #[arg(value_name = "TERMS", required = true)]
    pub terms: Vec<String>,

    /// Count repeated keywords once
    #[arg(long)]
    pub per_distinct_term: bool,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Held-out corpus (JSON Lines)
    #[arg(value_name = "CORPUS_FILE")]
    pub corpus: PathBuf,

    /// Class list to check the model against (default: the model's own classes)
    #[arg(short, long, value_name = "CLASSES_FILE")]
    pub classes: Option<PathBuf>,

    /// Count repeated keywords once
    #[arg(long)]
    pub per_distinct_term: bool,

    #[command(flatten)]
    pub parallel: ParallelArgs,
}

/// Arguments for inspecting configuration
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Class list file
    #[arg(short, long, value_name = "CLASSES_FILE")]
    pub classes: PathBuf,

    /// Keyword catalog file
    #[arg(short, long, value_name = "KEYWORDS_FILE")]
    pub keywords: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl ParallelArgs {
    /// Trainer configuration for these options.
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            parallel: self.parallel,
            thread_pool_size: self.threads,
        }
    }

    /// Evaluator configuration for these options.
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            parallel: self.parallel,
            thread_pool_size: self.threads,
        }
    }
}

/// Classifier configuration for the `--per-distinct-term` flag.
pub fn classifier_config(per_distinct_term: bool) -> ClassifierConfig {
    ClassifierConfig {
        occurrence_policy: if per_distinct_term {
            OccurrencePolicy::PerDistinctTerm
        } else {
            OccurrencePolicy::PerOccurrence
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_command() {
        let args = LexiclassArgs::try_parse_from([
            "lexiclass",
            "train",
            "--classes",
            "classes.txt",
            "--keywords",
            "keywords.tsv",
            "train.jsonl",
            "--parallel",
            "--threads",
            "4",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.classes, PathBuf::from("classes.txt"));
            assert_eq!(train_args.keywords, PathBuf::from("keywords.tsv"));
            assert_eq!(train_args.corpus, PathBuf::from("train.jsonl"));
            assert_eq!(train_args.output, PathBuf::from("model.json"));
            let config = train_args.parallel.trainer_config();
            assert!(config.parallel);
            assert_eq!(config.thread_pool_size, Some(4));
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_classify_command() {
        let args = LexiclassArgs::try_parse_from([
            "lexiclass",
            "classify",
            "--model",
            "model.json",
            "paris",
            "seine",
            "--per-distinct-term",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        if let Command::Classify(classify_args) = args.command {
            assert_eq!(classify_args.terms, vec!["paris", "seine"]);
            assert_eq!(
                classifier_config(classify_args.per_distinct_term).occurrence_policy,
                OccurrencePolicy::PerDistinctTerm
            );
        } else {
            panic!("Expected Classify command");
        }
    }

    #[test]
    fn test_threads_requires_parallel() {
        let result = LexiclassArgs::try_parse_from([
            "lexiclass",
            "evaluate",
            "--model",
            "model.json",
            "test.jsonl",
            "--threads",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let args = LexiclassArgs::try_parse_from([
            "lexiclass", "-vv", "inspect", "--classes", "classes.txt",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = LexiclassArgs::try_parse_from([
            "lexiclass", "-q", "inspect", "--classes", "classes.txt",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
