mod error;
mod lexicon;
#[allow(clippy::module_inception)]
mod classifier;
pub mod builder;
mod utils;

pub use error::{ClassifierError, ClassifierWarning};
pub use lexicon::{DepartmentEntry, KeywordEntry};
pub use classifier::{Classifier, ClassificationMethod, ClassificationResult};
pub use builder::ClassifierBuilder;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of keyword rules in the lexicon
    pub num_keywords: usize,
    /// Candidate labels for the remote predictor, in table order
    pub categories: Vec<String>,
    /// Department used for tags missing from the department table
    pub default_department: String,
    /// Whether a remote predictor is attached
    pub has_predictor: bool,
    /// Non-fatal problems found while building
    pub warnings: Vec<ClassifierWarning>,
}
