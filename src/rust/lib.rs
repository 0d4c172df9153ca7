//! A civic issue classifier that routes free-text reports to a department.
//!
//! Descriptions are matched against a keyword lexicon first. Only when no
//! keyword occurs as a whole word is a remote zero-shot model consulted.
//!
//! # Basic Usage
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use civic_tagger::{Classifier, ClassificationMethod, DepartmentEntry, KeywordEntry};
//!
//! let classifier = Classifier::builder()
//!     .with_keywords(vec![
//!         KeywordEntry::new("pothole", "roads"),
//!         KeywordEntry::new("bijli", "power_outage"),
//!     ])
//!     .with_departments(vec![
//!         DepartmentEntry::new("roads", "Public Works Department"),
//!         DepartmentEntry::new("power_outage", "Electricity Board"),
//!     ])
//!     .build()?;
//!
//! let result = classifier.classify("Bijli gayi hai since morning").await?;
//! assert_eq!(result.tag, "power_outage");
//! assert_eq!(result.confidence, 1.0);
//! assert_eq!(result.method, ClassificationMethod::KeywordMatch);
//! # Ok(())
//! # }
//! ```
//!
//! # Model Fallback
//!
//! Attach a [`LabelPredictor`] to classify descriptions with no keyword hit.
//! [`HuggingFacePredictor`] calls a hosted zero-shot model with every known
//! tag as a candidate label:
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use civic_tagger::{ClassifierBuilder, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_env();
//! let classifier = ClassifierBuilder::from_config(&config)?.build()?;
//! let result = classifier.classify("strange smell from the drain").await?;
//! println!("{} -> {}", result.tag, result.department);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod loader;
pub mod predictor;
mod runtime;
pub mod server;

pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, ClassifierWarning,
    ClassificationMethod, ClassificationResult, DepartmentEntry, KeywordEntry,
};
pub use predictor::{HuggingFacePredictor, LabelPredictor, LabelScore, PredictorError};
pub use runtime::{RuntimeConfig, DEFAULT_API_URL, DEFAULT_DEPARTMENT, DEFAULT_TIMEOUT_SECS};

pub fn init_logger() {
    env_logger::init();
}
