use std::sync::Arc;
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::error::{ClassifierError, ClassifierWarning};
use super::lexicon::{DepartmentMap, Lexicon};
use super::utils::{normalize_text, round_confidence};
use crate::predictor::{LabelPredictor, PredictorError};

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    KeywordMatch,
    TransformerModel,
}

/// The tag assigned to a description and where to route it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub tag: String,
    pub department: String,
    /// 1.0 for keyword matches; the model score rounded to two decimals otherwise
    pub confidence: f64,
    pub method: ClassificationMethod,
}

/// Classifies civic issue descriptions into department-routable tags.
///
/// Keyword matching runs first; the remote predictor is only consulted
/// when no keyword matches.
///
/// # Thread Safety
///
/// All reference data is immutable after build and held behind `Arc`, so a
/// classifier can be shared across tasks without locking:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use civic_tagger::{Classifier, DepartmentEntry, KeywordEntry};
/// use std::sync::Arc;
///
/// let classifier = Arc::new(Classifier::builder()
///     .with_keywords(vec![KeywordEntry::new("pothole", "roads")])
///     .with_departments(vec![DepartmentEntry::new("roads", "Public Works Department")])
///     .build()?);
///
/// let shared = Arc::clone(&classifier);
/// # let _ = shared;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Classifier {
    lexicon: Arc<Lexicon>,
    departments: Arc<DepartmentMap>,
    predictor: Option<Arc<dyn LabelPredictor>>,
    default_department: String,
    warnings: Vec<ClassifierWarning>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    pub(crate) fn new(
        lexicon: Arc<Lexicon>,
        departments: Arc<DepartmentMap>,
        predictor: Option<Arc<dyn LabelPredictor>>,
        default_department: String,
        warnings: Vec<ClassifierWarning>,
    ) -> Self {
        Self {
            lexicon,
            departments,
            predictor,
            default_department,
            warnings,
        }
    }

    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_keywords: self.lexicon.len(),
            categories: self.departments.categories().to_vec(),
            default_department: self.default_department.clone(),
            has_predictor: self.predictor.is_some(),
            warnings: self.warnings.clone(),
        }
    }

    /// Non-fatal problems found while building
    pub fn warnings(&self) -> &[ClassifierWarning] {
        &self.warnings
    }

    /// The candidate labels sent to the remote predictor, in table order
    pub fn categories(&self) -> &[String] {
        self.departments.categories()
    }

    /// The department for `tag`, or the configured default
    pub fn department_for(&self, tag: &str) -> &str {
        self.departments.department_of(tag).unwrap_or(&self.default_department)
    }

    /// Classifies a description, trying keywords before the remote model.
    ///
    /// # Returns
    /// * `Ok(ClassificationResult)` - with `KeywordMatch` and confidence 1.0
    ///   when any keyword occurs as a whole word, otherwise the predictor's
    ///   top label with `TransformerModel`. A blank description matches no
    ///   keyword and goes to the predictor like any other.
    /// * `Err(ClassifierError::RemoteCall)` - the fallback call failed
    ///
    /// # Example
    /// ```rust
    /// # use civic_tagger::{Classifier, ClassificationMethod, DepartmentEntry, KeywordEntry};
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let classifier = Classifier::builder()
    /// #     .with_keywords(vec![KeywordEntry::new("pothole", "roads")])
    /// #     .with_departments(vec![DepartmentEntry::new("roads", "Public Works Department")])
    /// #     .build()?;
    /// let result = classifier.classify("Huge pothole on Main Street").await?;
    /// assert_eq!(result.tag, "roads");
    /// assert_eq!(result.method, ClassificationMethod::KeywordMatch);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn classify(&self, description: &str) -> Result<ClassificationResult, ClassifierError> {
        if let Some(result) = self.classify_by_keyword(description) {
            return Ok(result);
        }

        info!("No keyword matched, falling back to the remote model");
        self.classify_by_model(description).await.map_err(|e| {
            error!("Model inference failure: {}", e);
            ClassifierError::RemoteCall(e)
        })
    }

    /// The keyword path alone: `None` when no keyword occurs as a whole word.
    pub fn classify_by_keyword(&self, description: &str) -> Option<ClassificationResult> {
        let text = normalize_text(description);
        let rule = self.lexicon.first_match(&text)?;
        info!("Keyword '{}' matched tag '{}'", rule.keyword, rule.tag);

        Some(ClassificationResult {
            tag: rule.tag.clone(),
            department: self.department_for(&rule.tag).to_string(),
            confidence: 1.0,
            method: ClassificationMethod::KeywordMatch,
        })
    }

    async fn classify_by_model(&self, description: &str) -> Result<ClassificationResult, PredictorError> {
        let predictor = self.predictor.as_ref().ok_or(PredictorError::NotConfigured)?;
        let ranking = predictor.predict(description, self.departments.categories()).await?;
        let top = ranking.into_iter()
            .next()
            .ok_or_else(|| PredictorError::MalformedResponse("empty ranking".into()))?;

        let tag = normalize_text(&top.label);
        Ok(ClassificationResult {
            department: self.department_for(&tag).to_string(),
            tag,
            confidence: round_confidence(top.score),
            method: ClassificationMethod::TransformerModel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use async_trait::async_trait;
    use crate::predictor::LabelScore;
    use crate::{DepartmentEntry, KeywordEntry};

    /// Records every call and replays a fixed outcome.
    struct ScriptedPredictor {
        calls: AtomicUsize,
        seen_labels: Mutex<Vec<Vec<String>>>,
        response: Result<Vec<LabelScore>, u16>,
    }

    impl ScriptedPredictor {
        fn ranking(pairs: &[(&str, f64)]) -> Self {
            Self::with(Ok(pairs.iter()
                .map(|(label, score)| LabelScore { label: label.to_string(), score: *score })
                .collect()))
        }

        fn failing(status: u16) -> Self {
            Self::with(Err(status))
        }

        fn with(response: Result<Vec<LabelScore>, u16>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen_labels: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl LabelPredictor for ScriptedPredictor {
        async fn predict(&self, _text: &str, candidate_labels: &[String]) -> Result<Vec<LabelScore>, PredictorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_labels.lock().unwrap().push(candidate_labels.to_vec());
            match &self.response {
                Ok(ranking) => Ok(ranking.clone()),
                Err(status) => Err(PredictorError::Status {
                    status: *status,
                    message: "Service Unavailable".into(),
                }),
            }
        }
    }

    fn build(predictor: Option<Arc<ScriptedPredictor>>) -> Classifier {
        let mut builder = Classifier::builder()
            .with_keywords(vec![
                KeywordEntry::new("pothole", "roads"),
                KeywordEntry::new("power outage", "electricity"),
                KeywordEntry::new("pani", "water_supply"),
                KeywordEntry::new("kachra", "garbage"),
            ])
            .with_departments(vec![
                DepartmentEntry::new("roads", "Public Works Department"),
                DepartmentEntry::new("electricity", "Electricity Board"),
                DepartmentEntry::new("water_supply", "Jal Board"),
            ])
            .with_default_department("General Administration");
        if let Some(predictor) = predictor {
            builder = builder.with_predictor(predictor);
        }
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn test_keyword_match_skips_predictor() {
        let predictor = Arc::new(ScriptedPredictor::failing(503));
        let classifier = build(Some(Arc::clone(&predictor)));

        let result = classifier.classify("Big POTHOLE outside school").await.unwrap();
        assert_eq!(result, ClassificationResult {
            tag: "roads".into(),
            department: "Public Works Department".into(),
            confidence: 1.0,
            method: ClassificationMethod::KeywordMatch,
        });
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_leftmost_keyword_wins() {
        let classifier = build(None);
        let result = classifier.classify("power outage near a pothole").await.unwrap();
        assert_eq!(result.tag, "electricity");
        assert_eq!(result.department, "Electricity Board");
    }

    #[tokio::test]
    async fn test_unknown_tag_uses_default_department() {
        let classifier = build(None);
        let result = classifier.classify("kachra everywhere").await.unwrap();
        assert_eq!(result.tag, "garbage");
        assert_eq!(result.department, "General Administration");
    }

    #[tokio::test]
    async fn test_fallback_calls_predictor_once_with_all_categories() {
        let predictor = Arc::new(ScriptedPredictor::ranking(&[("water_supply", 0.8765), ("roads", 0.1)]));
        let classifier = build(Some(Arc::clone(&predictor)));

        let result = classifier.classify("panini stall has a leak").await.unwrap();
        assert_eq!(result, ClassificationResult {
            tag: "water_supply".into(),
            department: "Jal Board".into(),
            confidence: 0.88,
            method: ClassificationMethod::TransformerModel,
        });
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(predictor.seen_labels.lock().unwrap()[0], vec![
            "roads".to_string(),
            "electricity".to_string(),
            "water_supply".to_string(),
        ]);
    }

    #[tokio::test]
    async fn test_model_label_outside_map_uses_default_department() {
        let predictor = Arc::new(ScriptedPredictor::ranking(&[("stray_animals", 0.61)]));
        let classifier = build(Some(predictor));
        let result = classifier.classify("dogs chasing people").await.unwrap();
        assert_eq!(result.department, "General Administration");
        assert_eq!(result.confidence, 0.61);
    }

    #[tokio::test]
    async fn test_predictor_failure_is_propagated() {
        let predictor = Arc::new(ScriptedPredictor::failing(503));
        let classifier = build(Some(predictor));
        let result = classifier.classify("something unusual happened").await;
        assert!(matches!(
            result,
            Err(ClassifierError::RemoteCall(PredictorError::Status { status: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn test_no_predictor_configured() {
        let classifier = build(None);
        let result = classifier.classify("something unusual happened").await;
        assert!(matches!(result, Err(ClassifierError::RemoteCall(PredictorError::NotConfigured))));
    }

    #[tokio::test]
    async fn test_blank_description_goes_to_predictor() {
        let predictor = Arc::new(ScriptedPredictor::ranking(&[("roads", 0.34)]));
        let classifier = build(Some(Arc::clone(&predictor)));

        let result = classifier.classify("   ").await.unwrap();
        assert_eq!(result.tag, "roads");
        assert_eq!(result.method, ClassificationMethod::TransformerModel);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_description_failure_is_remote_error() {
        let predictor = Arc::new(ScriptedPredictor::failing(400));
        let classifier = build(Some(Arc::clone(&predictor)));

        let result = classifier.classify("").await;
        assert!(matches!(
            result,
            Err(ClassifierError::RemoteCall(PredictorError::Status { status: 400, .. }))
        ));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_classification_is_idempotent() {
        let predictor = Arc::new(ScriptedPredictor::ranking(&[("roads", 0.456)]));
        let classifier = build(Some(predictor));
        for description in ["pani nahi aa raha", "cracked surface on the flyover"] {
            let first = classifier.classify(description).await.unwrap();
            let second = classifier.classify(description).await.unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_info() {
        let classifier = build(None);
        let info = classifier.info();
        assert_eq!(info.num_keywords, 4);
        assert_eq!(info.categories.len(), 3);
        assert!(!info.has_predictor);
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn test_keyword_path_is_sync() {
        let classifier = build(None);
        let result = tokio_test::block_on(classifier.classify("no pani since monday")).unwrap();
        assert_eq!(result.tag, "water_supply");
        assert!(classifier.classify_by_keyword("panini").is_none());
    }
}
