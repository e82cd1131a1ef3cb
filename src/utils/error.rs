use thiserror::Error;

/// 介面層向使用者顯示的 AI 無法回應訊息 (HTTP 422)
pub const INTERPRETATION_UNAVAILABLE_TEXT: &str = "К сожалению, произошла ошибка при получении ответа от ИИ. Пожалуйста, попробуйте снова через некоторое время.";

#[derive(Error, Debug)]
pub enum ReadingError {
    #[error("API request failed: {0}")]
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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Endpoint not found (404). Please check if the server is running and the endpoint exists: {endpoint}")]
    EndpointNotFound { endpoint: String },

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("{}", INTERPRETATION_UNAVAILABLE_TEXT)]
    InterpretationUnavailable,

    #[error("{message}")]
    Gateway { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReadingError {
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_)
            | Self::EndpointNotFound { .. }
            | Self::HttpStatus { .. }
            | Self::InterpretationUnavailable
            | Self::Gateway { .. } => ErrorCategory::Network,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::Storage { .. } => ErrorCategory::Storage,
            Self::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InterpretationUnavailable => ErrorSeverity::Low,
            Self::ApiError(_) | Self::HttpStatus { .. } | Self::Gateway { .. } => {
                ErrorSeverity::Medium
            }
            Self::EndpointNotFound { .. } | Self::SerializationError(_) | Self::Storage { .. } => {
                ErrorSeverity::High
            }
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the reading server is running and retry the action",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
            ErrorCategory::Storage => "Check that the state file is readable and writable",
            ErrorCategory::Data => "The server returned an unexpected payload; retry later",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InterpretationUnavailable => INTERPRETATION_UNAVAILABLE_TEXT.to_string(),
            Self::EndpointNotFound { endpoint } => {
                format!("Reading service endpoint is unavailable: {}", endpoint)
            }
            other => match other.category() {
                ErrorCategory::Network => format!("Network problem: {}", other),
                ErrorCategory::Configuration => format!("Configuration problem: {}", other),
                ErrorCategory::Storage => format!("Storage problem: {}", other),
                ErrorCategory::Data => format!("Data problem: {}", other),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_displays_raw_message() {
        let err = ReadingError::gateway("Timeout");
        assert_eq!(err.to_string(), "Timeout");
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_status_errors_match_wire_texts() {
        assert_eq!(
            ReadingError::HttpStatus { status: 500 }.to_string(),
            "HTTP error! status: 500"
        );
        let not_found = ReadingError::EndpointNotFound {
            endpoint: "http://127.0.0.1:8000/analyze".to_string(),
        };
        assert!(not_found.to_string().contains("(404)"));
        assert!(not_found.to_string().ends_with("/analyze"));
        assert_eq!(
            ReadingError::InterpretationUnavailable.to_string(),
            INTERPRETATION_UNAVAILABLE_TEXT
        );
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = ReadingError::MissingConfigError {
            field: "gateway.api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }
}
