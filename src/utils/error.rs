use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported file format: '{path}'. Please provide a CSV or JSON file.")]
    UnsupportedFormat { path: String },

    #[error("Parse error in {source_path}: {message}")]
    ParseError {
        source_path: String,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Repository request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown profile '{name}'. Available profiles: {available}")]
    UnknownProfile { name: String, available: String },
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 對應的程序退出碼，致命錯誤一律非零
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ImportError {
    pub fn parse(source_path: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::ParseError {
            source_path: source_path.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ImportError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::UnsupportedFormat { .. }
            | ImportError::ParseError { .. }
            | ImportError::SerializationError(_) => ErrorCategory::Source,
            ImportError::ConfigError { .. }
            | ImportError::MissingConfigError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::UnknownProfile { .. } => ErrorCategory::Configuration,
            ImportError::IoError(_) | ImportError::HttpError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ImportError::HttpError(_) => ErrorSeverity::Medium,
            ImportError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::UnsupportedFormat { .. } => {
                "Use a source file with a .csv or .json extension"
            }
            ImportError::ParseError { .. } => {
                "Check that the file is well-formed: a CSV header row, or a JSON array of objects with string values"
            }
            ImportError::SerializationError(_) => "The run summary could not be serialized as JSON",
            ImportError::IoError(_) => "Make sure the source file exists and is readable",
            ImportError::HttpError(_) => "Check that the customer store is reachable",
            ImportError::ConfigError { .. }
            | ImportError::MissingConfigError { .. }
            | ImportError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file"
            }
            ImportError::UnknownProfile { .. } => {
                "Pass one of the profile names defined under [profiles] in the configuration"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("Source file not found: {}", e)
            }
            other => other.to_string(),
        }
    }
}

/// Per-record failures. These are reported and never abort the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("row has {found} fields but the header has {expected}")]
    ColumnMismatch { expected: usize, found: usize },

    #[error("customer lookup failed: {0}")]
    LookupFailed(String),

    #[error("customer save failed: {0}")]
    SaveFailed(String),
}

/// Errors surfaced by a customer repository. `NotFound` is kept apart from
/// every other failure so that absence is never guessed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("customer not found: {email}")]
    NotFound { email: String },

    #[error("customer rejected by store: {0}")]
    Rejected(String),

    #[error("customer store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for RepositoryError {
    fn from(e: reqwest::Error) -> Self {
        RepositoryError::Unavailable(e.to_string())
    }
}
