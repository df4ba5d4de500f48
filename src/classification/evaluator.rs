//! Building confusion matrices over labeled corpora.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classification::classifier::Classifier;
use crate::classification::confusion::ConfusionMatrix;
use crate::corpus::{DocId, DocumentCorpus};
use crate::error::{LexiclassError, Result};
use crate::parallel::build_thread_pool;

/// Configuration for evaluation runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Classify documents on a thread pool.
    pub parallel: bool,

    /// Thread pool size for the parallel run.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,
}

/// Classifies every document of a corpus and tallies the outcomes.
///
/// Any failure aborts the run; no document is skipped.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create a new evaluator.
    pub fn new(config: EvaluatorConfig) -> Self {
        Evaluator { config }
    }

    /// Get the evaluator configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Classify every document of `corpus` and return the confusion matrix.
    pub fn evaluate(
        &self,
        corpus: &dyn DocumentCorpus,
        classifier: &Classifier<'_>,
    ) -> Result<ConfusionMatrix> {
        let document_count = corpus.document_count()?;
        let classes = classifier.registry().labels().to_vec();
        if document_count == 0 {
            log::warn!("Evaluation corpus has no documents");
            return Ok(ConfusionMatrix::new(classes));
        }

        let matrix = if self.config.parallel {
            let pool = build_thread_pool(self.config.thread_pool_size, "lexiclass-eval")?;
            log::debug!(
                "Evaluating {document_count} documents on {} threads",
                pool.current_num_threads()
            );
            pool.install(|| {
                (0..document_count)
                    .into_par_iter()
                    .try_fold(
                        || ConfusionMatrix::new(classes.clone()),
                        |mut matrix, doc_id| {
                            evaluate_document(corpus, classifier, doc_id, &mut matrix)?;
                            Ok::<_, LexiclassError>(matrix)
                        },
                    )
                    .try_reduce(
                        || ConfusionMatrix::new(classes.clone()),
                        |left, right| Ok(left.merge(right)),
                    )
            })?
        } else {
            log::debug!("Evaluating {document_count} documents");
            let mut matrix = ConfusionMatrix::new(classes);
            for doc_id in 0..document_count {
                evaluate_document(corpus, classifier, doc_id, &mut matrix)?;
            }
            matrix
        };

        log::info!(
            "Evaluated {} documents: {} classified correctly",
            matrix.total(),
            matrix.correct()
        );

        Ok(matrix)
    }
}

fn evaluate_document(
    corpus: &dyn DocumentCorpus,
    classifier: &Classifier<'_>,
    doc_id: DocId,
    matrix: &mut ConfusionMatrix,
) -> Result<()> {
    let label = corpus.label_of(doc_id)?;
    let actual = classifier.registry().index_of(&label).ok_or_else(|| {
        LexiclassError::configuration(format!(
            "document {doc_id} is labeled '{label}' which is not in the class list"
        ))
    })?;
    let terms = corpus.terms_of(doc_id)?;
    let prediction = classifier.predict(&terms);

    if log::log_enabled!(log::Level::Trace) {
        log::trace!(
            "document {doc_id}: actual '{label}', predicted '{}', scores [{}]",
            classifier.registry().labels()[prediction.class_index],
            format_scores(classifier.registry().labels(), &classifier.scores(&terms))
        );
    }

    matrix.record(prediction.class_index, actual);
    Ok(())
}

fn format_scores(labels: &[String], scores: &[f64]) -> String {
    labels
        .iter()
        .zip(scores)
        .map(|(label, score)| format!("{label}={score:.4}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Evaluate with the sequential reference pass.
pub fn evaluate(corpus: &dyn DocumentCorpus, classifier: &Classifier<'_>) -> Result<ConfusionMatrix> {
    Evaluator::default().evaluate(corpus, classifier)
}
