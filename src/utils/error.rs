use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Failed to load model from {path}: {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Model invocation failed: {message}")]
    ModelInvocationError { message: String },

    #[error("Feature importance not available: {reason}")]
    FeatureImportanceUnavailable { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input {field}: '{value}' ({reason})")]
    InvalidInputError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Model,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::ModelLoadError { .. }
            | PricingError::ModelInvocationError { .. }
            | PricingError::FeatureImportanceUnavailable { .. } => ErrorCategory::Model,
            PricingError::ConfigError { .. } | PricingError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            PricingError::InvalidInputError { .. } => ErrorCategory::Input,
            PricingError::IoError(_) | PricingError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PricingError::FeatureImportanceUnavailable { .. } => ErrorSeverity::Low,
            PricingError::ModelInvocationError { .. } => ErrorSeverity::Medium,
            PricingError::ConfigError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::InvalidInputError { .. }
            | PricingError::SerializationError(_) => ErrorSeverity::High,
            PricingError::ModelLoadError { .. } | PricingError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PricingError::ModelLoadError { path, .. } => format!(
                "Check that '{}' exists and is a model file exported with format_version 1",
                path
            ),
            PricingError::ModelInvocationError { .. } => {
                "Make sure the model was trained on the six pricing features in the expected order"
                    .to_string()
            }
            PricingError::FeatureImportanceUnavailable { .. } => {
                "Use a linear or tree_ensemble model to see feature importances".to_string()
            }
            PricingError::ConfigError { .. } => {
                "Check the TOML configuration file syntax".to_string()
            }
            PricingError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration", field)
            }
            PricingError::InvalidInputError { field, .. } => {
                format!("Re-enter '{}' within its allowed range", field)
            }
            PricingError::IoError(_) => "Check file paths and permissions".to_string(),
            PricingError::SerializationError(_) => {
                "Check that the file contains valid JSON".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PricingError::ModelLoadError { path, .. } => {
                format!("The pricing model at '{}' could not be loaded", path)
            }
            PricingError::ModelInvocationError { message } => {
                format!("The pricing model could not produce an estimate: {}", message)
            }
            PricingError::FeatureImportanceUnavailable { .. } => {
                "Feature importance not available.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn invocation(message: impl Into<String>) -> Self {
        PricingError::ModelInvocationError {
            message: message.into(),
        }
    }

    pub(crate) fn importance_unavailable(reason: impl Into<String>) -> Self {
        PricingError::FeatureImportanceUnavailable {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
