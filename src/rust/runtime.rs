use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://router.huggingface.co/hf-inference/models/facebook/bart-large-mnli";
pub const DEFAULT_DEPARTMENT: &str = "General Grievances Cell / Public Relations Office";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Runtime settings for the service: where the reference tables live, how
/// to reach the remote predictor, and where to listen.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub keywords_path: PathBuf,
    pub departments_path: PathBuf,
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub default_department: String,
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            keywords_path: PathBuf::from("data/tag_keywords.csv"),
            departments_path: PathBuf::from("data/tag_departments.csv"),
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_department: DEFAULT_DEPARTMENT.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup, falling back to defaults
    /// for absent or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout = match get("HF_TIMEOUT_SECS").map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => Duration::from_secs(secs),
            Some(_) => {
                log::warn!("Ignoring invalid HF_TIMEOUT_SECS, using {}s", DEFAULT_TIMEOUT_SECS);
                defaults.timeout
            }
            None => defaults.timeout,
        };

        Self {
            keywords_path: get("CIVIC_KEYWORDS_CSV").map(PathBuf::from).unwrap_or(defaults.keywords_path),
            departments_path: get("CIVIC_DEPARTMENTS_CSV").map(PathBuf::from).unwrap_or(defaults.departments_path),
            api_url: get("HF_API_URL").unwrap_or(defaults.api_url),
            api_token: get("HF_TOKEN"),
            timeout,
            default_department: get("CIVIC_DEFAULT_DEPARTMENT").unwrap_or(defaults.default_department),
            bind_addr: get("CIVIC_BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }
}
