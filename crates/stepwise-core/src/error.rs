//! Error types for workflow definition operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Field-level validation failures collected before submission
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    /// Invalid operation argument (index out of range, malformed value)
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Same-assignment group rejected when saving it
    #[error("Invalid same-assignment group for department {department_id}: {reason}")]
    Grouping { department_id: u64, reason: String },
    /// No same-assignment group exists for the department
    #[error("No same-assignment group for department {department_id}")]
    GroupNotFound { department_id: u64 },
    /// Workflow process not found for the given ID
    #[error("Workflow process with ID {id} not found")]
    WorkflowNotFound { id: u64 },
    /// Department not found for the given ID
    #[error("Department with ID {id} not found")]
    DepartmentNotFound { id: u64 },
    /// The backend answered with a non-success status
    #[error("Backend responded with status {status}: {message}")]
    Backend { status: u16, message: String },
    /// Transport-level HTTP failures
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    /// Local store connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WorkflowError {
        WorkflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a grouping error for a department.
    pub fn grouping(department_id: u64, reason: impl Into<String>) -> Self {
        Self::Grouping {
            department_id,
            reason: reason.into(),
        }
    }

    /// Wraps a transport error from the HTTP client.
    pub fn http(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            message: message.into(),
            source,
        }
    }

    /// Whether the error was caught locally, before anything reached a
    /// backend. Local errors are corrected by editing; remote ones by
    /// resubmitting.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidInput { .. }
                | Self::Grouping { .. }
                | Self::GroupNotFound { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::database(message).with_source(e))
    }
}

/// Specialized extension trait for HTTP client Results.
pub trait HttpResultExt<T> {
    /// Map transport errors with a message.
    fn http_context(self, message: &str) -> Result<T>;
}

impl<T> HttpResultExt<T> for std::result::Result<T, reqwest::Error> {
    fn http_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::http(message, e))
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;
