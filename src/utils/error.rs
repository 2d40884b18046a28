use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("XML parsing failed: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttrError(#[from] quick_xml::events::attributes::AttrError),

    #[error("PDF parsing failed: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed document '{filename}': {reason}")]
    MalformedDocument { filename: String, reason: String },

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parsing,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    /// Wraps any parse failure as a per-document `MalformedDocument`.
    pub fn malformed(filename: &str, cause: impl std::fmt::Display) -> Self {
        AuditError::MalformedDocument {
            filename: filename.to_string(),
            reason: cause.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::IoError(_) => ErrorCategory::Io,
            AuditError::ZipError(_)
            | AuditError::XmlError(_)
            | AuditError::XmlAttrError(_)
            | AuditError::PdfError(_)
            | AuditError::MalformedDocument { .. } => ErrorCategory::Parsing,
            AuditError::ConfigError { .. }
            | AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AuditError::CsvError(_)
            | AuditError::SerializationError(_)
            | AuditError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Recovered per document by the batch orchestrator.
            AuditError::MalformedDocument { .. } => ErrorSeverity::Low,
            AuditError::ZipError(_)
            | AuditError::XmlError(_)
            | AuditError::XmlAttrError(_)
            | AuditError::PdfError(_) => ErrorSeverity::Medium,
            AuditError::ConfigError { .. }
            | AuditError::ConfigValidationError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::ProcessingError { .. }
            | AuditError::CsvError(_)
            | AuditError::SerializationError(_) => ErrorSeverity::High,
            AuditError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AuditError::IoError(e) => format!("Could not read or write a file: {}", e),
            AuditError::MalformedDocument { filename, reason } => {
                format!("'{}' could not be opened as a document: {}", filename, reason)
            }
            AuditError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            AuditError::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the input files exist and the output directory is writable",
            ErrorCategory::Parsing => {
                "Re-save the document from its authoring application and try again"
            }
            ErrorCategory::Configuration => {
                "Check the command-line flags and the TOML policy file for typos"
            }
            ErrorCategory::Processing => "Run again with --verbose and inspect the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
