//! Estimation of class priors and Laplace-smoothed keyword likelihoods.
//!
//! Training is a single pass over the corpus that accumulates integer counts
//! into a [`TrainingCounts`], followed by an estimation step that turns those
//! counts into a [`ProbabilityModel`]:
//!
//! ```text
//! P(c)     = docs(c) / docs
//! P(k | c) = (freq(k, c) + 1) / (words(c) + |V|)
//! ```
//!
//! Terms containing an ASCII digit are ignored everywhere. The pass can run on
//! a rayon pool; workers fill private accumulators that are merged by
//! element-wise summation, so the counts do not depend on the number of
//! workers or on document order.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use ahash::RandomState;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classification::catalog::KeywordCatalog;
use crate::classification::model::ProbabilityModel;
use crate::classification::registry::ClassRegistry;
use crate::corpus::{DocId, DocumentCorpus, TermBag};
use crate::error::{LexiclassError, Result};
use crate::parallel::build_thread_pool;

static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("digit pattern is valid"));

/// Check whether a term takes part in training (it contains no digit).
pub fn is_feature_term(term: &str) -> bool {
    !DIGIT.is_match(term)
}

/// Configuration for training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Run the corpus pass on a thread pool.
    pub parallel: bool,

    /// Thread pool size for the parallel pass.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,
}

/// Integer counts gathered in the training pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingCounts {
    class_document_counts: Vec<u64>,
    class_word_totals: Vec<u64>,
    word_class_frequency: HashMap<String, Vec<u64>, RandomState>,
}

impl TrainingCounts {
    /// Create empty counts for `class_count` classes.
    pub fn new(class_count: usize) -> Self {
        TrainingCounts {
            class_document_counts: vec![0; class_count],
            class_word_totals: vec![0; class_count],
            word_class_frequency: HashMap::default(),
        }
    }

    /// Add one document of the class at `class_index`.
    ///
    /// Callers resolve `class_index` through the registry the counts were
    /// sized for.
    pub(crate) fn observe(&mut self, class_index: usize, terms: &TermBag) {
        let class_count = self.class_document_counts.len();
        self.class_document_counts[class_index] += 1;

        for (term, count) in terms.iter() {
            if !is_feature_term(term) {
                continue;
            }
            let count = count as u64;
            let frequencies = self
                .word_class_frequency
                .entry(term.to_string())
                .or_insert_with(|| vec![0; class_count]);
            frequencies[class_index] += count;
            self.class_word_totals[class_index] += count;
        }
    }

    /// Fold `other` into these counts.
    pub fn merge(mut self, other: TrainingCounts) -> Self {
        for (total, other_total) in self
            .class_document_counts
            .iter_mut()
            .zip(other.class_document_counts)
        {
            *total += other_total;
        }
        for (total, other_total) in self
            .class_word_totals
            .iter_mut()
            .zip(other.class_word_totals)
        {
            *total += other_total;
        }
        for (term, other_frequencies) in other.word_class_frequency {
            match self.word_class_frequency.get_mut(&term) {
                Some(frequencies) => {
                    for (frequency, other_frequency) in
                        frequencies.iter_mut().zip(other_frequencies)
                    {
                        *frequency += other_frequency;
                    }
                }
                None => {
                    self.word_class_frequency.insert(term, other_frequencies);
                }
            }
        }
        self
    }

    /// Total number of observed documents.
    pub fn document_count(&self) -> u64 {
        self.class_document_counts.iter().sum()
    }

    /// Documents observed for the class at `class_index`.
    pub fn class_document_count(&self, class_index: usize) -> u64 {
        self.class_document_counts
            .get(class_index)
            .copied()
            .unwrap_or(0)
    }

    /// Digit-free term occurrences observed for the class at `class_index`.
    pub fn class_word_total(&self, class_index: usize) -> u64 {
        self.class_word_totals.get(class_index).copied().unwrap_or(0)
    }

    /// Occurrences of `term` in documents of the class at `class_index`.
    ///
    /// Terms never observed have frequency zero.
    pub fn frequency_of(&self, term: &str, class_index: usize) -> u64 {
        match self.word_class_frequency.get(term) {
            Some(frequencies) => frequencies.get(class_index).copied().unwrap_or(0),
            None => 0,
        }
    }

    /// Number of distinct digit-free terms observed.
    pub fn vocabulary_size(&self) -> usize {
        self.word_class_frequency.len()
    }
}

/// Builds probability models from labeled corpora.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a new trainer.
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    /// Get the trainer configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train a model on `corpus`.
    ///
    /// Fails with a configuration error if the catalog and class list
    /// disagree or a document carries an unknown label, and with an empty
    /// corpus error if there are no documents or some class has none.
    pub fn train(
        &self,
        corpus: &dyn DocumentCorpus,
        registry: &ClassRegistry,
        catalog: &KeywordCatalog,
    ) -> Result<ProbabilityModel> {
        catalog.validate(registry)?;
        let counts = self.count(corpus, registry)?;
        let model = estimate(&counts, registry, catalog)?;

        log::info!(
            "Trained model on {} documents: {} classes, {} keywords, vocabulary size {}",
            model.document_count(),
            model.class_count(),
            model.keyword_count(),
            model.vocabulary_size()
        );

        Ok(model)
    }

    /// Run the corpus pass and return the raw counts.
    pub fn count(
        &self,
        corpus: &dyn DocumentCorpus,
        registry: &ClassRegistry,
    ) -> Result<TrainingCounts> {
        let document_count = corpus.document_count()?;
        if document_count == 0 {
            return Err(LexiclassError::empty_corpus(
                "training corpus has no documents",
            ));
        }

        let class_count = registry.len();

        if self.config.parallel {
            let pool = build_thread_pool(self.config.thread_pool_size, "lexiclass-train")?;
            log::debug!(
                "Counting {document_count} documents on {} threads",
                pool.current_num_threads()
            );
            pool.install(|| {
                (0..document_count)
                    .into_par_iter()
                    .try_fold(
                        || TrainingCounts::new(class_count),
                        |mut counts, doc_id| {
                            observe_document(corpus, registry, doc_id, &mut counts)?;
                            Ok::<_, LexiclassError>(counts)
                        },
                    )
                    .try_reduce(
                        || TrainingCounts::new(class_count),
                        |left, right| Ok(left.merge(right)),
                    )
            })
        } else {
            log::debug!("Counting {document_count} documents");
            let mut counts = TrainingCounts::new(class_count);
            for doc_id in 0..document_count {
                observe_document(corpus, registry, doc_id, &mut counts)?;
            }
            Ok(counts)
        }
    }
}

fn observe_document(
    corpus: &dyn DocumentCorpus,
    registry: &ClassRegistry,
    doc_id: DocId,
    counts: &mut TrainingCounts,
) -> Result<()> {
    let label = corpus.label_of(doc_id)?;
    let class_index = registry.index_of(&label).ok_or_else(|| {
        LexiclassError::configuration(format!(
            "document {doc_id} is labeled '{label}' which is not in the class list"
        ))
    })?;
    let terms = corpus.terms_of(doc_id)?;
    counts.observe(class_index, &terms);
    Ok(())
}

/// Turn training counts into a probability model.
///
/// Every keyword of every class gets a smoothed probability under every
/// class, including keywords that never occur in the corpus.
pub fn estimate(
    counts: &TrainingCounts,
    registry: &ClassRegistry,
    catalog: &KeywordCatalog,
) -> Result<ProbabilityModel> {
    let document_count = counts.document_count();
    if document_count == 0 {
        return Err(LexiclassError::empty_corpus(
            "cannot compute class priors without documents",
        ));
    }

    let class_count = registry.len();
    let class_document_counts: Vec<u64> = (0..class_count)
        .map(|class_index| counts.class_document_count(class_index))
        .collect();
    let class_word_totals: Vec<u64> = (0..class_count)
        .map(|class_index| counts.class_word_total(class_index))
        .collect();

    for (label, &docs) in registry.labels().iter().zip(&class_document_counts) {
        if docs == 0 {
            return Err(LexiclassError::empty_corpus(format!(
                "class '{label}' has no training documents; its prior would be zero"
            )));
        }
    }
    let class_priors: Vec<f64> = class_document_counts
        .iter()
        .map(|&docs| docs as f64 / document_count as f64)
        .collect();

    let vocabulary_size = counts.vocabulary_size();
    let mut conditionals: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for label in registry.labels() {
        let keywords = catalog.keywords_of(label).ok_or_else(|| {
            LexiclassError::configuration(format!("class '{label}' has no keyword catalog entry"))
        })?;

        for keyword in keywords {
            if conditionals.contains_key(keyword) {
                continue;
            }
            let row = (0..class_count)
                .map(|class_index| {
                    let denominator = class_word_totals[class_index] + vocabulary_size as u64;
                    if denominator == 0 {
                        return Err(LexiclassError::empty_corpus(format!(
                            "no digit-free terms observed; cannot smooth '{keyword}' for class '{}'",
                            registry.labels()[class_index]
                        )));
                    }
                    let frequency = counts.frequency_of(keyword, class_index);
                    Ok((frequency + 1) as f64 / denominator as f64)
                })
                .collect::<Result<Vec<f64>>>()?;
            conditionals.insert(keyword.clone(), row);
        }
    }

    Ok(ProbabilityModel::from_parts(
        registry.labels().to_vec(),
        class_priors,
        class_document_counts,
        class_word_totals,
        document_count,
        vocabulary_size,
        conditionals,
    ))
}

/// Train a model with the sequential reference pass.
pub fn train(
    corpus: &dyn DocumentCorpus,
    registry: &ClassRegistry,
    catalog: &KeywordCatalog,
) -> Result<ProbabilityModel> {
    Trainer::default().train(corpus, registry, catalog)
}
