//! Filter types for querying workflow processes.

use super::{OutputType, WorkflowProcess};

/// Filter options for listing workflow processes.
#[derive(Debug, Clone, Default)]
pub struct WorkflowFilter {
    /// Only processes producing this output type
    pub output_type: Option<OutputType>,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
    /// Maximum number of processes returned
    pub limit: Option<u32>,
}

impl WorkflowFilter {
    /// Whether any output-type or name condition is set.
    pub fn has_conditions(&self) -> bool {
        self.output_type.is_some() || self.name_contains.is_some()
    }

    /// Whether a process passes the output-type and name conditions.
    pub fn matches(&self, process: &WorkflowProcess) -> bool {
        let type_matches = self
            .output_type
            .is_none_or(|output_type| process.output_type == output_type);
        let name_matches = self.name_contains.as_ref().is_none_or(|needle| {
            process
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        type_matches && name_matches
    }
}
