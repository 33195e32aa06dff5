use thiserror::Error;

#[derive(Error, Debug)]
pub enum TravelError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{service} responded with HTTP {status}: {message}")]
    ServiceError {
        service: String,
        status: u16,
        message: String,
    },

    #[error("Malformed {service} response: {message}")]
    MalformedResponse { service: String, message: String },

    #[error("Trip planning step '{step}' cannot run yet: {message}")]
    WizardError { step: String, message: String },

    #[error("Language model error: {message}")]
    LanguageModelError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Service,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TravelError {
    pub fn service(service: &str, status: u16, body: &str) -> Self {
        // 只保留回應內容的開頭，避免把整個錯誤頁面寫進日誌
        let message: String = body.chars().take(200).collect();
        TravelError::ServiceError {
            service: service.to_string(),
            status,
            message,
        }
    }

    pub fn malformed(service: &str, message: impl Into<String>) -> Self {
        TravelError::MalformedResponse {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        TravelError::ValidationError {
            message: message.into(),
        }
    }

    pub fn wizard(step: &str, message: impl Into<String>) -> Self {
        TravelError::WizardError {
            step: step.to_string(),
            message: message.into(),
        }
    }

    pub fn language_model(message: impl Into<String>) -> Self {
        TravelError::LanguageModelError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TravelError::ApiError(_) => ErrorCategory::Network,
            TravelError::ConfigError { .. }
            | TravelError::InvalidConfigValueError { .. }
            | TravelError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TravelError::ValidationError { .. } | TravelError::WizardError { .. } => {
                ErrorCategory::Validation
            }
            TravelError::ServiceError { .. }
            | TravelError::MalformedResponse { .. }
            | TravelError::LanguageModelError { .. } => ErrorCategory::Service,
            TravelError::CsvError(_) | TravelError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            TravelError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Service => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TravelError::ApiError(_) => {
                "Check your network connection and try again".to_string()
            }
            TravelError::ServiceError { service, status, .. } => match status {
                401 | 403 => format!("Check the {} credentials in your configuration", service),
                429 => format!("{} rate limit reached, wait a moment and retry", service),
                _ => format!("{} may be temporarily unavailable, retry later", service),
            },
            TravelError::MalformedResponse { service, .. } => {
                format!("{} returned unexpected data, retry or report the issue", service)
            }
            TravelError::ConfigError { .. }
            | TravelError::InvalidConfigValueError { .. }
            | TravelError::MissingConfigError { .. } => {
                "Review travel-buddy.toml and the referenced environment variables".to_string()
            }
            TravelError::ValidationError { .. } => {
                "Correct the highlighted input and run the command again".to_string()
            }
            TravelError::WizardError { .. } => {
                "Complete the earlier planning steps first".to_string()
            }
            TravelError::LanguageModelError { .. } => {
                "Check the [llm] section and your API key".to_string()
            }
            TravelError::CsvError(_) | TravelError::SerializationError(_) => {
                "Check the output format settings".to_string()
            }
            TravelError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TravelError::ApiError(_) => "Could not reach a travel service".to_string(),
            TravelError::ServiceError { service, status, .. } => {
                format!("{} rejected the request (HTTP {})", service, status)
            }
            other => other.to_string(),
        }
    }

    /// Process exit code for the binary, derived from severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TravelError>;
