//! Same-assignment grouping for the WorkflowEditor.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;

use super::{DraftGroup, DraftStep, StepKey, WorkflowEditor};
use crate::{
    error::{Result, WorkflowError},
    params::AssignSame,
    validation::Warning,
};

/// Steps of one department, by current number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSteps {
    pub department_id: u64,
    pub steps: Vec<u32>,
}

impl WorkflowEditor {
    /// Saves the same-assignment group of a department, replacing any
    /// existing group for it.
    ///
    /// Every selected number must be a current step assigned to the
    /// department. The selection is resolved to step identities here, so
    /// later reorders do not change who is in the group.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Grouping` - When the selection is empty, names a
    ///   missing step, or names a step of another department
    pub fn assign_same(&mut self, params: &AssignSame) -> Result<&DraftGroup> {
        let department_id = params.department_id;
        if params.steps.is_empty() {
            return Err(WorkflowError::grouping(
                department_id,
                "select at least one step",
            ));
        }

        let mut members = BTreeSet::new();
        for number in &params.steps {
            let step = self.step_by_number(*number).ok_or_else(|| {
                WorkflowError::grouping(department_id, format!("step {number} does not exist"))
            })?;
            if step.record.department_id != Some(department_id) {
                return Err(WorkflowError::grouping(
                    department_id,
                    format!("step {number} is not assigned to this department"),
                ));
            }
            members.insert(step.key);
        }

        debug!(
            "Saving same-assignment group for department {} with {} steps",
            department_id,
            members.len()
        );
        let position = match self
            .groups
            .iter()
            .position(|group| group.department_id == department_id)
        {
            Some(position) => {
                self.groups[position].members = members;
                position
            }
            None => {
                self.groups.push(DraftGroup {
                    department_id,
                    members,
                });
                self.groups.len() - 1
            }
        };
        Ok(&self.groups[position])
    }

    /// Deletes the same-assignment group of a department. Steps are not
    /// affected.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::GroupNotFound` - When the department has no group
    pub fn remove_group(&mut self, department_id: u64) -> Result<DraftGroup> {
        let position = self
            .groups
            .iter()
            .position(|group| group.department_id == department_id)
            .ok_or(WorkflowError::GroupNotFound { department_id })?;
        Ok(self.groups.remove(position))
    }

    /// The group of a department, if any.
    pub fn group_for(&self, department_id: u64) -> Option<&DraftGroup> {
        self.groups
            .iter()
            .find(|group| group.department_id == department_id)
    }

    /// Whether a step is part of any same-assignment group.
    pub fn is_grouped(&self, key: StepKey) -> bool {
        self.groups.iter().any(|group| group.members.contains(&key))
    }

    /// Steps currently assigned to a department, in order.
    pub fn steps_in_department(&self, department_id: u64) -> Vec<&DraftStep> {
        self.steps
            .iter()
            .filter(|step| step.record.department_id == Some(department_id))
            .collect()
    }

    /// Departments with more than one step; only these can form a
    /// meaningful group. Ordered by department id.
    pub fn grouping_candidates(&self) -> Vec<DepartmentSteps> {
        let mut by_department: BTreeMap<u64, Vec<u32>> = BTreeMap::new();
        for step in &self.steps {
            if let Some(department_id) = step.record.department_id {
                by_department
                    .entry(department_id)
                    .or_default()
                    .push(step.record.step);
            }
        }

        by_department
            .into_iter()
            .filter(|(_, steps)| steps.len() > 1)
            .map(|(department_id, steps)| DepartmentSteps {
                department_id,
                steps,
            })
            .collect()
    }

    /// Steps without a department.
    pub fn warnings(&self) -> Vec<Warning> {
        self.steps
            .iter()
            .filter(|step| step.record.department_id.is_none())
            .map(|step| Warning::MissingDepartment {
                step: step.record.step,
                name: step.record.name.clone(),
            })
            .collect()
    }
}
