use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to load model artifact '{path}': {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Model '{model}' expects features {expected:?}, artifact declares {found:?}")]
    FeatureMismatchError {
        model: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Scoring failed in {model}: {message}")]
    ScoringError { model: String, message: String },

    #[error("Page {url} returned HTTP {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Model,
    Network,
    Data,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InsightError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InsightError::ModelLoadError { .. }
            | InsightError::FeatureMismatchError { .. }
            | InsightError::ScoringError { .. } => ErrorCategory::Model,
            InsightError::ApiError(_) | InsightError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            InsightError::CsvError(_) | InsightError::SerializationError(_) => {
                ErrorCategory::Data
            }
            InsightError::ConfigValidationError { .. }
            | InsightError::InvalidConfigValueError { .. }
            | InsightError::MissingConfigError { .. } => ErrorCategory::Config,
            InsightError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Model => ErrorSeverity::Critical,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short message for end users, without internal detail.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Model => {
                "Food analysis is unavailable: the scoring models could not be used.".to_string()
            }
            ErrorCategory::Network => format!("Could not reach the nutrition site ({})", self),
            ErrorCategory::Data => format!("Received data could not be processed ({})", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InsightError::ModelLoadError { .. } => {
                "Check that both model artifacts exist and are valid JSON (see --models-dir)"
            }
            InsightError::FeatureMismatchError { .. } => {
                "Re-export the model with the feature names and order the analyzer expects"
            }
            InsightError::ScoringError { .. } => "Re-export the model artifacts and try again",
            InsightError::ApiError(_) | InsightError::HttpStatusError { .. } => {
                "Check network connectivity and the configured start URLs"
            }
            InsightError::CsvError(_) | InsightError::SerializationError(_) => {
                "Check the output directory and the crawled records"
            }
            InsightError::ConfigValidationError { .. }
            | InsightError::InvalidConfigValueError { .. }
            | InsightError::MissingConfigError { .. } => {
                "Fix the configuration value and run again"
            }
            InsightError::IoError(_) => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
