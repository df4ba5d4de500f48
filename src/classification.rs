//! Keyword-restricted multinomial Naive Bayes classification.
//!
//! The pipeline runs leaf-first:
//!
//! - [`ClassRegistry`] fixes the ordered class list.
//! - [`KeywordCatalog`] lists the keywords scored for each class.
//! - [`Trainer`] turns a labeled [`DocumentCorpus`](crate::corpus::DocumentCorpus)
//!   into a [`ProbabilityModel`].
//! - [`Classifier`] scores a term bag against every class of a model.
//! - [`Evaluator`] classifies a held-out corpus into a [`ConfusionMatrix`].
//!
//! # Example
//!
//! ```
//! use lexiclass::classification::{ClassRegistry, Classifier, KeywordCatalog, train};
//! use lexiclass::corpus::{MemoryCorpus, TermBag};
//!
//! let registry = ClassRegistry::new(["A", "B"])?;
//! let catalog = KeywordCatalog::parse("A\tx\nB\ty\n")?;
//!
//! let mut corpus = MemoryCorpus::new();
//! corpus.add_document("A", TermBag::from_occurrences(["x", "x", "z"]));
//! corpus.add_document("B", TermBag::from_occurrences(["y", "z"]));
//!
//! let model = train(&corpus, &registry, &catalog)?;
//! let classifier = Classifier::new(&model, &registry)?;
//! assert_eq!(classifier.classify(&TermBag::from_occurrences(["x"])), "A");
//! # Ok::<(), lexiclass::error::LexiclassError>(())
//! ```

pub mod catalog;
pub mod classifier;
pub mod confusion;
pub mod evaluator;
pub mod model;
pub mod registry;
pub mod trainer;

pub use catalog::KeywordCatalog;
pub use classifier::{Classifier, ClassifierConfig, OccurrencePolicy, Prediction, classify};
pub use confusion::ConfusionMatrix;
pub use evaluator::{Evaluator, EvaluatorConfig, evaluate};
pub use model::ProbabilityModel;
pub use registry::ClassRegistry;
pub use trainer::{Trainer, TrainerConfig, TrainingCounts, estimate, is_feature_term, train};
