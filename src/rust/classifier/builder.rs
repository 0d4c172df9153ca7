use std::sync::Arc;
use log::{info, warn};

use super::error::{ClassifierError, ClassifierWarning};
use super::lexicon::{DepartmentEntry, DepartmentMap, KeywordEntry, Lexicon};
use super::classifier::Classifier;
use crate::loader;
use crate::predictor::{HuggingFacePredictor, LabelPredictor};
use crate::runtime::{RuntimeConfig, DEFAULT_DEPARTMENT};

/// A builder for constructing a Classifier with a fluent interface.
#[derive(Default)]
pub struct ClassifierBuilder {
    keywords: Option<Vec<KeywordEntry>>,
    departments: Option<Vec<DepartmentEntry>>,
    predictor: Option<Arc<dyn LabelPredictor>>,
    default_department: Option<String>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder
    ///
    /// # Example
    /// ```
    /// use civic_tagger::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keyword lexicon, in source table order.
    ///
    /// Rows are normalized when the classifier is built. Earlier rows win
    /// ties between keywords matching at the same position.
    pub fn with_keywords(mut self, keywords: Vec<KeywordEntry>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Sets the tag to department table. For repeated tags the last row wins.
    pub fn with_departments(mut self, departments: Vec<DepartmentEntry>) -> Self {
        self.departments = Some(departments);
        self
    }

    /// Sets the remote predictor used when no keyword matches
    pub fn with_predictor(mut self, predictor: Arc<dyn LabelPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Sets the department reported for tags missing from the department table
    pub fn with_default_department(mut self, department: impl Into<String>) -> Self {
        self.default_department = Some(department.into());
        self
    }

    /// Loads both reference tables and the Hugging Face predictor from a
    /// runtime configuration.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - Either CSV file is missing or unreadable
    ///   - A table lacks its required columns or has no rows
    ///   - The HTTP client for the predictor cannot be created
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let keywords = loader::load_keywords(&config.keywords_path)?;
        let departments = loader::load_departments(&config.departments_path)?;
        let predictor = HuggingFacePredictor::from_config(config)
            .map_err(|e| ClassifierError::Configuration(format!("Failed to create predictor: {}", e)))?;

        Ok(Self::new()
            .with_keywords(keywords)
            .with_departments(departments)
            .with_predictor(Arc::new(predictor))
            .with_default_department(config.default_department.clone()))
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - Either table was not supplied or is empty
    ///   - A row has an empty keyword, tag or department
    ///   - The default department is blank
    ///
    /// A predictor without a credential does not fail the build; it is
    /// logged and reported through `Classifier::warnings()`.
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use civic_tagger::{ClassifierBuilder, DepartmentEntry, KeywordEntry};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .with_keywords(vec![KeywordEntry::new("pothole", "roads")])
    ///     .with_departments(vec![DepartmentEntry::new("roads", "Public Works Department")])
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let keywords = self.keywords
            .ok_or_else(|| ClassifierError::Configuration("Keyword table must be set".to_string()))?;
        let departments = self.departments
            .ok_or_else(|| ClassifierError::Configuration("Department table must be set".to_string()))?;

        let lexicon = Lexicon::from_entries(&keywords)?;
        let department_map = DepartmentMap::from_entries(&departments)?;

        let default_department = self.default_department
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());
        if default_department.is_empty() {
            return Err(ClassifierError::Configuration("Default department cannot be empty".into()));
        }

        let mut warnings = Vec::new();
        match &self.predictor {
            Some(predictor) if !predictor.has_credential() => {
                warn!("{}; descriptions without a keyword match will fail", ClassifierWarning::CredentialMissing);
                warnings.push(ClassifierWarning::CredentialMissing);
            }
            Some(_) => {}
            None => warn!("No label predictor configured; only keyword matching is available"),
        }

        info!(
            "Classifier ready: {} keywords, {} categories",
            lexicon.len(),
            department_map.categories().len()
        );

        Ok(Classifier::new(
            Arc::new(lexicon),
            Arc::new(department_map),
            self.predictor,
            default_department,
            warnings,
        ))
    }
}
