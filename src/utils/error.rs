use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid CSS selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Page {page} returned status {status}")]
    PageFetchError { page: u32, status: u16 },

    #[error("Listing element on page {page} is missing '{field}'")]
    MissingFieldError { page: u32, field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Extraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::PageFetchError { .. } => ErrorCategory::Network,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::SelectorError { .. } | EtlError::MissingFieldError { .. } => {
                ErrorCategory::Extraction
            }
        }
    }

    /// 單頁、單筆的錯誤屬於 Low：管線會略過並繼續執行
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::PageFetchError { .. } | EtlError::MissingFieldError { .. } => {
                ErrorSeverity::Low
            }
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::SerializationError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::SelectorError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and the proxy settings, then run again"
            }
            ErrorCategory::Storage => {
                "Check that the output path exists and is writable"
            }
            ErrorCategory::Configuration => {
                "Review the command-line flags or the TOML configuration file"
            }
            ErrorCategory::Extraction => {
                "The listing page markup may have changed; review the selectors"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => {
                "The listing site did not answer in time".to_string()
            }
            EtlError::ApiError(e) if e.is_connect() => {
                "Could not connect to the listing site".to_string()
            }
            EtlError::IoError(e) => format!("Could not read or write output files: {}", e),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
