use thiserror::Error;

#[derive(Error, Debug)]
pub enum AeroxError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("{tool} failed ({status}):\n{output}")]
    ToolError {
        tool: String,
        status: String,
        output: String,
    },

    #[error("Failed to parse {file}: {message}")]
    ParseError { file: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, AeroxError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ExternalTool,
    Parsing,
    Processing,
    System,
}

impl AeroxError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AeroxError::ConfigError { .. }
            | AeroxError::ConfigValidationError { .. }
            | AeroxError::InvalidConfigValueError { .. }
            | AeroxError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AeroxError::ToolError { .. } => ErrorCategory::ExternalTool,
            AeroxError::ParseError { .. } | AeroxError::CsvError(_) => ErrorCategory::Parsing,
            AeroxError::ProcessingError { .. } => ErrorCategory::Processing,
            AeroxError::IoError(_) | AeroxError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::ExternalTool => ErrorSeverity::High,
            ErrorCategory::Parsing | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AeroxError::ToolError { tool, .. } => format!(
                "Check that {} is installed and reachable (PATH or the configured executable path)",
                tool
            ),
            AeroxError::ParseError { file, .. } => format!(
                "Inspect {} in the working directory; the producing tool may have aborted mid-write",
                file
            ),
            AeroxError::ConfigError { .. }
            | AeroxError::ConfigValidationError { .. }
            | AeroxError::InvalidConfigValueError { .. }
            | AeroxError::MissingConfigError { .. } => {
                "Review the CLI flags or the TOML configuration file".to_string()
            }
            AeroxError::ProcessingError { .. } => {
                "The analysis produced no usable data; check the solver settings and the alpha sweep"
                    .to_string()
            }
            AeroxError::IoError(_) => {
                "Check filesystem permissions and free space in the working directory".to_string()
            }
            _ => "See the error message for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AeroxError::ToolError { tool, status, .. } => {
                format!("External tool {} failed ({})", tool, status)
            }
            AeroxError::ParseError { file, message } => {
                format!("Could not read {}: {}", file, message)
            }
            other => other.to_string(),
        }
    }
}
