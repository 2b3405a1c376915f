//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{Department, WorkflowProcess};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use stepwise_core::{display::CreateResult, models::Department};
///
/// let department = Department { id: 4, name: "Quality".to_string() };
/// let output = format!("{}", CreateResult::new(department));
/// assert!(output.contains("Created department with ID: 4"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<WorkflowProcess> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created workflow process with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Department> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created department with ID: {}", self.resource.id)?;
        writeln!(f)?;
        writeln!(f, "- {}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of changes.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<WorkflowProcess> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated workflow process with ID: {} (now version {})",
            self.resource.id, self.resource.version
        )?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<WorkflowProcess> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted workflow process '{}' (ID: {})",
            self.resource.name, self.resource.id
        )
    }
}
