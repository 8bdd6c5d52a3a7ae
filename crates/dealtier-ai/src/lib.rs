//! Classifier adapter layer: the narrow async seam between the ranking
//! pipeline and the external text-classification service, plus the
//! LLM-backed implementation of it.

mod classifier;
mod llm;

pub use classifier::{CategoryClassifier, CategoryRequest, ClassifierError, NullClassifier};
pub use llm::LlmClassifier;
