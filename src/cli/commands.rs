//! Command implementations for the Lexiclass CLI.

use std::time::Instant;

use crate::classification::{
    ClassRegistry, Classifier, Evaluator, KeywordCatalog, ProbabilityModel, Trainer,
};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::{JsonlCorpus, TermBag};
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: LexiclassArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Classify(classify_args) => classify_terms(classify_args, &args),
        Command::Evaluate(evaluate_args) => evaluate_model(evaluate_args, &args),
        Command::Inspect(inspect_args) => inspect_configuration(inspect_args, &args),
    }
}

/// Train a model and write it to disk.
fn train_model(args: &TrainArgs, cli_args: &LexiclassArgs) -> Result<()> {
    log::info!("Loading class list from {}", args.classes.display());
    let registry = ClassRegistry::load(&args.classes)?;
    log::info!("Loading keyword catalog from {}", args.keywords.display());
    let catalog = KeywordCatalog::load(&args.keywords)?;
    let corpus = JsonlCorpus::open(&args.corpus)?;

    let start_time = Instant::now();
    let model = Trainer::new(args.parallel.trainer_config()).train(&corpus, &registry, &catalog)?;
    let duration = start_time.elapsed();

    model.save(&args.output)?;

    let classes = registry
        .labels()
        .iter()
        .enumerate()
        .map(|(class_index, class)| ClassPrior {
            class: class.clone(),
            documents: model.class_document_count(class_index).unwrap_or(0),
            prior: model.prior(class_index).unwrap_or(0.0),
        })
        .collect();

    output_result(
        "Model trained successfully",
        &TrainingResult {
            model_path: args.output.to_string_lossy().to_string(),
            documents: model.document_count(),
            keywords: model.keyword_count(),
            vocabulary_size: model.vocabulary_size(),
            classes,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify the terms given on the command line.
fn classify_terms(args: &ClassifyArgs, cli_args: &LexiclassArgs) -> Result<()> {
    let model = ProbabilityModel::load(&args.model)?;
    let registry = ClassRegistry::new(model.classes().to_vec())?;
    let classifier =
        Classifier::with_config(&model, &registry, classifier_config(args.per_distinct_term))?;

    let terms = TermBag::from_occurrences(args.terms.iter().cloned());
    let scores = classifier
        .scores(&terms)
        .into_iter()
        .zip(registry.labels())
        .map(|(log_score, class)| ClassScore {
            class: class.clone(),
            log_score,
        })
        .collect();

    output_result(
        "Classification complete",
        &ClassificationResult {
            predicted: classifier.classify(&terms).to_string(),
            scores,
        },
        cli_args,
    )
}

/// Evaluate a model against a labeled corpus.
fn evaluate_model(args: &EvaluateArgs, cli_args: &LexiclassArgs) -> Result<()> {
    let model = ProbabilityModel::load(&args.model)?;
    let registry = match &args.classes {
        Some(path) => ClassRegistry::load(path)?,
        None => ClassRegistry::new(model.classes().to_vec())?,
    };
    let classifier =
        Classifier::with_config(&model, &registry, classifier_config(args.per_distinct_term))?;
    let corpus = JsonlCorpus::open(&args.corpus)?;

    let start_time = Instant::now();
    let matrix = Evaluator::new(args.parallel.evaluator_config()).evaluate(&corpus, &classifier)?;
    let duration = start_time.elapsed();

    output_result(
        "Evaluation complete",
        &EvaluationResult::from_matrix(matrix, duration.as_millis() as u64),
        cli_args,
    )
}

/// List classes and, when a catalog is given, their keywords.
fn inspect_configuration(args: &InspectArgs, cli_args: &LexiclassArgs) -> Result<()> {
    let registry = ClassRegistry::load(&args.classes)?;
    let catalog = match &args.keywords {
        Some(path) => {
            let catalog = KeywordCatalog::load(path)?;
            catalog.validate(&registry)?;
            Some(catalog)
        }
        None => None,
    };

    let classes = registry
        .labels()
        .iter()
        .map(|class| ClassKeywords {
            class: class.clone(),
            keywords: catalog
                .as_ref()
                .and_then(|catalog| catalog.keywords_of(class))
                .map(|keywords| keywords.to_vec()),
        })
        .collect();

    output_result(
        "Configuration loaded",
        &InspectionResult { classes },
        cli_args,
    )
}
