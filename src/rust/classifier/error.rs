use crate::predictor::PredictorError;

/// Represents the different types of errors that can occur in the issue classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Reference data is missing or malformed. The service must not start.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The remote label predictor failed on the fallback path
    #[error("Remote call error: {0}")]
    RemoteCall(#[from] PredictorError),
}

/// Non-fatal problems detected while building a classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierWarning {
    /// No API credential is available for the remote predictor. Keyword
    /// classification works; the model fallback fails when reached.
    #[error("No API credential configured for the remote label predictor")]
    CredentialMissing,
}
