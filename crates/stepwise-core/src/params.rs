//! Parameter structures for Stepwise operations
//!
//! These structures are shared by every interface (the CLI today) without
//! framework-specific derives. Interface layers define their own argument
//! types (clap derives, help text) and convert into these with `From`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │───▶│  Core Params    │───▶│ Editor / Client │
//! │  (clap derives) │    │ (minimal deps)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    models::{OutputType, Subprocess},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for starting a new workflow definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkflow {
    pub name: String,
    pub description: String,
    pub output_type: OutputType,
}

/// Parameters for listing workflow processes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWorkflows {
    /// Only this output type ("product", "accessory", "material")
    pub output_type: Option<String>,
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Maximum number of matching processes returned
    pub limit: Option<u32>,
}

impl ListWorkflows {
    /// Parse the output type filter.
    pub fn parsed_output_type(&self) -> Result<Option<OutputType>> {
        self.output_type
            .as_deref()
            .map(|value| {
                value
                    .parse::<OutputType>()
                    .map_err(|reason| WorkflowError::invalid_input("outputType").with_reason(reason))
            })
            .transpose()
    }
}

/// Parameters for deleting a workflow process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteWorkflow {
    pub id: u64,
    /// Deletion is refused unless confirmed
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for listing departments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDepartments {
    pub limit: Option<u32>,
}

/// Parameters for adding a department.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
}

/// Contents of a new step. The step number is assigned by the editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInput {
    pub name: String,
    pub description: String,
    pub estimated_number_of_days: u32,
    pub number_of_days_before_deadline: u32,
    pub role_of_the_person_in_charge: String,
    pub department_id: Option<u64>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_step_with_cost: bool,
    pub check_fields: Option<BTreeSet<String>>,
    pub is_show_request_material: Option<bool>,
}

impl StepInput {
    /// Build an unpersisted step record at the given position.
    pub fn into_subprocess(self, step: u32) -> Subprocess {
        Subprocess {
            id: None,
            name: self.name,
            description: self.description,
            estimated_number_of_days: self.estimated_number_of_days,
            number_of_days_before_deadline: self.number_of_days_before_deadline,
            role_of_the_person_in_charge: self.role_of_the_person_in_charge,
            department_id: self.department_id,
            is_required: self.is_required,
            is_step_with_cost: self.is_step_with_cost,
            check_fields: self.check_fields,
            is_show_request_material: self.is_show_request_material,
            step,
        }
    }
}

/// Partial update of an existing step. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStep {
    /// 0-based index of the step to edit
    pub index: usize,
    pub name: Option<String>,
    pub description: Option<String>,
    pub estimated_number_of_days: Option<u32>,
    pub number_of_days_before_deadline: Option<u32>,
    pub role_of_the_person_in_charge: Option<String>,
    pub department_id: Option<u64>,
    /// Unassign the department; conflicts with `department_id`
    #[serde(default)]
    pub clear_department: bool,
    pub is_required: Option<bool>,
    pub is_step_with_cost: Option<bool>,
    pub check_fields: Option<BTreeSet<String>>,
    pub is_show_request_material: Option<bool>,
}

impl UpdateStep {
    /// Apply the update to a copy of `current`.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When both a department and
    ///   `clear_department` are given
    pub fn apply_to(&self, current: &Subprocess) -> Result<Subprocess> {
        if self.clear_department && self.department_id.is_some() {
            return Err(WorkflowError::invalid_input("departmentId")
                .with_reason("cannot set and clear the department at the same time"));
        }

        let mut updated = current.clone();
        if let Some(name) = &self.name {
            updated.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            updated.description.clone_from(description);
        }
        if let Some(days) = self.estimated_number_of_days {
            updated.estimated_number_of_days = days;
        }
        if let Some(days) = self.number_of_days_before_deadline {
            updated.number_of_days_before_deadline = days;
        }
        if let Some(role) = &self.role_of_the_person_in_charge {
            updated.role_of_the_person_in_charge.clone_from(role);
        }
        if self.clear_department {
            updated.department_id = None;
        } else if self.department_id.is_some() {
            updated.department_id = self.department_id;
        }
        if let Some(required) = self.is_required {
            updated.is_required = required;
        }
        if let Some(with_cost) = self.is_step_with_cost {
            updated.is_step_with_cost = with_cost;
        }
        if let Some(tags) = &self.check_fields {
            updated.check_fields = Some(tags.clone());
        }
        if self.is_show_request_material.is_some() {
            updated.is_show_request_material = self.is_show_request_material;
        }
        Ok(updated)
    }

    /// Whether the update changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.estimated_number_of_days.is_none()
            && self.number_of_days_before_deadline.is_none()
            && self.role_of_the_person_in_charge.is_none()
            && self.department_id.is_none()
            && !self.clear_department
            && self.is_required.is_none()
            && self.is_step_with_cost.is_none()
            && self.check_fields.is_none()
            && self.is_show_request_material.is_none()
    }
}

/// Parameters for removing a step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveStep {
    /// 0-based index of the step
    pub index: usize,
}

/// Parameters for moving a step (drag and drop).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveStep {
    /// 0-based source index
    pub from: usize,
    /// 0-based destination index
    pub to: usize,
}

/// Parameters for saving a same-assignment group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignSame {
    pub department_id: u64,
    /// Current step numbers handled by the same assignee
    pub steps: BTreeSet<u32>,
}
