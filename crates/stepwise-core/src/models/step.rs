//! Step record definitions and the fetched-to-flat conversion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::DepartmentRef;

/// One ordered step ("subprocess") of a workflow process, in the flat shape
/// the editor works with and the backend accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Subprocess {
    /// Backend identifier, absent until the step has been saved once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Short name of the step
    pub name: String,

    /// What happens during the step
    pub description: String,

    /// Expected duration in days
    pub estimated_number_of_days: u32,

    /// Lead time in days for the deadline notice
    pub number_of_days_before_deadline: u32,

    /// Label for who is expected to act
    pub role_of_the_person_in_charge: String,

    /// Department handling the step, if assigned
    #[serde(default)]
    pub department_id: Option<u64>,

    /// Whether the step may not be skipped
    #[serde(default)]
    pub is_required: bool,

    /// Whether completing the step carries a cost
    #[serde(default)]
    pub is_step_with_cost: bool,

    /// Extra data fields collected during the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_fields: Option<BTreeSet<String>>,

    /// Whether the material-request sub-form is shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_show_request_material: Option<bool>,

    /// 1-based position in execution order
    pub step: u32,
}

/// A step as returned by the backend, with the department nested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FetchedSubprocess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub estimated_number_of_days: u32,
    pub number_of_days_before_deadline: u32,
    pub role_of_the_person_in_charge: String,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
    /// Some backends send the bare id alongside or instead of the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<u64>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_step_with_cost: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_fields: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_show_request_material: Option<bool>,
    pub step: u32,
}

impl FetchedSubprocess {
    /// Department id, preferring the nested object.
    pub fn resolved_department_id(&self) -> Option<u64> {
        self.department
            .as_ref()
            .map(|department| department.id)
            .or(self.department_id)
    }

    /// Department name when the backend nested it.
    pub fn department_name(&self) -> Option<&str> {
        self.department
            .as_ref()
            .map(|department| department.name.as_str())
    }
}

impl From<FetchedSubprocess> for Subprocess {
    /// Flatten `department.id` into `departmentId`.
    fn from(fetched: FetchedSubprocess) -> Self {
        let department_id = fetched.resolved_department_id();
        Self {
            id: fetched.id,
            name: fetched.name,
            description: fetched.description,
            estimated_number_of_days: fetched.estimated_number_of_days,
            number_of_days_before_deadline: fetched.number_of_days_before_deadline,
            role_of_the_person_in_charge: fetched.role_of_the_person_in_charge,
            department_id,
            is_required: fetched.is_required,
            is_step_with_cost: fetched.is_step_with_cost,
            check_fields: fetched.check_fields,
            is_show_request_material: fetched.is_show_request_material,
            step: fetched.step,
        }
    }
}
