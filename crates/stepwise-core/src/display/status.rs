//! Status messages for operation feedback.

use std::fmt;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Failure,
}

/// A one-line confirmation, warning or error shown after a command.
pub struct OperationStatus {
    pub message: String,
    pub kind: StatusKind,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    /// Create a new warning status.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Warning,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Failure,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            StatusKind::Success => "Success:",
            StatusKind::Warning => "Warning:",
            StatusKind::Failure => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}
