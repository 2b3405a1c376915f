//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{Department, FieldTag, WorkflowSummary};

/// Newtype wrapper for displaying collections of workflow summaries.
///
/// # Examples
///
/// ```rust
/// use stepwise_core::{
///     display::WorkflowSummaries,
///     models::{OutputType, WorkflowSummary},
/// };
///
/// let summary = WorkflowSummary {
///     id: 1,
///     name: "Order approval".to_string(),
///     description: "Approves incoming orders".to_string(),
///     output_type: OutputType::Product,
///     version: 3,
///     updated_at: None,
///     total_steps: 4,
///     required_steps: 2,
///     cost_steps: 1,
///     departments: 2,
/// };
///
/// let output = format!("{}", WorkflowSummaries(vec![summary]));
/// assert!(output.contains("Order approval"));
/// ```
pub struct WorkflowSummaries(pub Vec<WorkflowSummary>);

impl WorkflowSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of workflow summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the workflow summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, WorkflowSummary> {
        self.0.iter()
    }
}

impl Index<usize> for WorkflowSummaries {
    type Output = WorkflowSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a WorkflowSummaries {
    type Item = &'a WorkflowSummary;
    type IntoIter = std::slice::Iter<'a, WorkflowSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for WorkflowSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No workflow processes found.")
        } else {
            for summary in &self.0 {
                write!(f, "{summary}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying departments as a list.
pub struct Departments(pub Vec<Department>);

impl Departments {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Department> {
        self.0.iter()
    }

    /// Name of a department by id.
    pub fn name_of(&self, id: u64) -> Option<&str> {
        self.0
            .iter()
            .find(|department| department.id == id)
            .map(|department| department.name.as_str())
    }
}

impl Index<usize> for Departments {
    type Output = Department;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl fmt::Display for Departments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No departments found.")
        } else {
            for department in &self.0 {
                writeln!(f, "- {department}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying the field-tag catalog.
pub struct FieldTags(pub Vec<FieldTag>);

impl FieldTags {
    pub fn iter(&self) -> std::slice::Iter<'_, FieldTag> {
        self.0.iter()
    }
}

impl fmt::Display for FieldTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in &self.0 {
            writeln!(f, "- {tag}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputType;

    fn create_test_summary() -> WorkflowSummary {
        WorkflowSummary {
            id: 1,
            name: "Order approval".to_string(),
            description: "Approves incoming orders".to_string(),
            output_type: OutputType::Accessory,
            version: 2,
            updated_at: None,
            total_steps: 3,
            required_steps: 1,
            cost_steps: 0,
            departments: 2,
        }
    }

    #[test]
    fn test_workflow_summaries_display() {
        let output = format!("{}", WorkflowSummaries(vec![create_test_summary()]));
        assert!(output.contains("## Order approval (ID: 1)"));
        assert!(output.contains("- **Output**: Accessory"));
        assert!(output.contains("- **Steps**: 3 (1 required, 0 with cost)"));
        assert!(!output.contains("**Updated**"));

        let mut second = create_test_summary();
        second.id = 2;
        second.name = "Second flow".to_string();
        let output = format!(
            "{}",
            WorkflowSummaries(vec![create_test_summary(), second])
        );
        assert!(output.contains("ID: 1"));
        assert!(output.contains("## Second flow (ID: 2)"));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(
            format!("{}", WorkflowSummaries(vec![])),
            "No workflow processes found.\n"
        );
        assert_eq!(format!("{}", Departments(vec![])), "No departments found.\n");
    }

    #[test]
    fn test_departments_display() {
        let departments = Departments(vec![
            Department {
                id: 3,
                name: "Logistics".to_string(),
            },
            Department {
                id: 1,
                name: "Sales".to_string(),
            },
        ]);
        assert_eq!(
            format!("{departments}"),
            "- Logistics (ID 3)\n- Sales (ID 1)\n"
        );
        assert_eq!(departments.name_of(1), Some("Sales"));
        assert_eq!(departments.name_of(2), None);
    }

    #[test]
    fn test_field_tags_display() {
        let output = format!("{}", FieldTags(FieldTag::catalog().to_vec()));
        assert!(output.contains("- `unitPrice`: Unit price"));
        assert_eq!(output.lines().count(), FieldTag::catalog().len());
    }
}
