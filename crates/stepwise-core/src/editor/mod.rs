//! In-memory editing of a workflow definition.
//!
//! A [`WorkflowEditor`] owns the ordered steps of one workflow process while
//! an operator adds, edits, removes and reorders them. Each step receives a
//! [`StepKey`] when it enters the editor; same-assignment groups hold keys,
//! never positions, so removing or moving a step cannot silently hand a
//! group's membership to a different step.
//!
//! Step numbers (`step`) are kept equal to `index + 1` after every
//! operation, and recomputed once more when the payload is built.
//!
//! ```text
//! fetch ──▶ WorkflowEditor::from_process ──▶ add/edit/remove/move/group ──▶ to_payload ──▶ submit
//!            (flatten, assign keys)            (keys stay stable)           (keys → numbers)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use stepwise_core::{editor::WorkflowEditor, models::OutputType, params::StepInput};
//!
//! let mut editor = WorkflowEditor::new("Sample approval", "Approves samples", OutputType::Material);
//! let step = |name: &str| StepInput {
//!     name: name.to_string(),
//!     description: "Review the sample".to_string(),
//!     estimated_number_of_days: 2,
//!     number_of_days_before_deadline: 1,
//!     role_of_the_person_in_charge: "Lab lead".to_string(),
//!     department_id: Some(1),
//!     ..Default::default()
//! };
//! editor.add_step(step("Intake"))?;
//! editor.add_step(step("Testing"))?;
//! editor.move_step(1, 0)?;
//!
//! let payload = editor.to_payload()?;
//! assert_eq!(payload.subprocesses[0].name, "Testing");
//! assert_eq!(payload.subprocesses[0].step, 1);
//! # Ok::<(), stepwise_core::WorkflowError>(())
//! ```

use std::{collections::BTreeSet, fmt};

use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{OutputType, SameAssign, Subprocess, WorkflowPayload, WorkflowProcess},
    params::CreateWorkflow,
    validation::ValidationReport,
};

pub mod grouping;
pub mod step_ops;

#[cfg(test)]
mod tests;

pub use grouping::DepartmentSteps;

/// Stable identity of a step for the lifetime of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepKey(Uuid);

impl StepKey {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StepKey {
    /// Short form: the first eight hex digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// A step held by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftStep {
    pub key: StepKey,
    pub record: Subprocess,
}

/// A same-assignment group tracked by step identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftGroup {
    pub department_id: u64,
    pub members: BTreeSet<StepKey>,
}

/// Editing state of one workflow definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEditor {
    id: Option<u64>,
    version: Option<u32>,
    name: String,
    description: String,
    output_type: OutputType,
    steps: Vec<DraftStep>,
    #[serde(default)]
    groups: Vec<DraftGroup>,
}

impl WorkflowEditor {
    /// Start a new, unpersisted workflow definition with no steps.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        output_type: OutputType,
    ) -> Self {
        Self {
            id: None,
            version: None,
            name: name.into(),
            description: description.into(),
            output_type,
            steps: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Hydrate an editor from a fetched workflow process.
    ///
    /// Steps are ordered by their stored number, departments flattened and
    /// fresh keys assigned. Group numbers are resolved to keys through the
    /// fetched numbering; numbers that match no step are dropped, as are
    /// members assigned to another department. Groups of one department
    /// are merged.
    pub fn from_process(process: WorkflowProcess) -> Self {
        let mut fetched = process.subprocesses;
        fetched.sort_by_key(|step| step.step);

        let steps: Vec<DraftStep> = fetched
            .into_iter()
            .map(|step| DraftStep {
                key: StepKey::new(),
                record: Subprocess::from(step),
            })
            .collect();

        let groups = process
            .same_assigns
            .into_iter()
            .filter_map(|group| {
                let members: BTreeSet<StepKey> = group
                    .steps
                    .iter()
                    .filter_map(|number| {
                        let found = steps.iter().find(|step| step.record.step == *number);
                        if found.is_none() {
                            warn!(
                                "Workflow {}: same-assignment group of department {} references missing step {}",
                                process.id, group.department_id, number
                            );
                        }
                        found.map(|step| step.key)
                    })
                    .collect();
                (!members.is_empty()).then_some(DraftGroup {
                    department_id: group.department_id,
                    members,
                })
            })
            .collect();

        let mut editor = Self {
            id: Some(process.id),
            version: Some(process.version),
            name: process.name,
            description: process.description,
            output_type: process.output_type,
            steps,
            groups,
        };
        editor.normalize();
        editor
    }

    /// Restore an editor from its JSON form, repairing anything a hand edit
    /// may have broken.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut editor: Self = serde_json::from_str(json)?;
        editor.normalize();
        Ok(editor)
    }

    /// Serialize the full editing state, keys included.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Backend id, if the definition was persisted before.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Version of the process this editor was hydrated from.
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_output_type(&mut self, output_type: OutputType) {
        self.output_type = output_type;
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[DraftStep] {
        &self.steps
    }

    /// Same-assignment groups by identity.
    pub fn groups(&self) -> &[DraftGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current 0-based position of a step.
    pub fn index_of(&self, key: StepKey) -> Option<usize> {
        self.steps.iter().position(|step| step.key == key)
    }

    /// Current 1-based number of a step.
    pub fn number_of(&self, key: StepKey) -> Option<u32> {
        self.index_of(key).map(|index| index as u32 + 1)
    }

    /// Step currently holding a number.
    pub fn step_by_number(&self, number: u32) -> Option<&DraftStep> {
        (number as usize)
            .checked_sub(1)
            .and_then(|index| self.steps.get(index))
    }

    /// Same-assignment groups in wire form, by current step number.
    pub fn same_assigns(&self) -> Vec<SameAssign> {
        self.groups
            .iter()
            .map(|group| {
                SameAssign::new(
                    group.department_id,
                    group.members.iter().filter_map(|key| self.number_of(*key)),
                )
            })
            .collect()
    }

    /// Build the submission payload.
    ///
    /// Numbering is derived from the final order in one pass, so the payload
    /// is correct even if the stored numbers drifted.
    pub fn to_payload(&self) -> Result<WorkflowPayload> {
        let payload = self.build_payload();
        payload.validate()?;
        Ok(payload)
    }

    /// Validate without building the payload for the caller.
    pub fn validate(&self) -> Result<ValidationReport> {
        self.build_payload().validate()
    }

    fn build_payload(&self) -> WorkflowPayload {
        let subprocesses = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| Subprocess {
                step: index as u32 + 1,
                ..step.record.clone()
            })
            .collect();

        WorkflowPayload {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            output_type: self.output_type,
            subprocesses,
            same_assigns: self.same_assigns(),
        }
    }

    /// Restore the invariants: contiguous numbering, one group per
    /// department, groups that only reference present steps of their
    /// department, no empty groups.
    pub fn normalize(&mut self) {
        self.renumber();

        let mut merged: Vec<DraftGroup> = Vec::with_capacity(self.groups.len());
        for group in self.groups.drain(..) {
            match merged
                .iter_mut()
                .find(|existing| existing.department_id == group.department_id)
            {
                Some(existing) => {
                    warn!(
                        "Merging duplicate same-assignment groups of department {}",
                        group.department_id
                    );
                    existing.members.extend(group.members);
                }
                None => merged.push(group),
            }
        }
        self.groups = merged;

        let steps = &self.steps;
        for group in &mut self.groups {
            let department_id = group.department_id;
            group.members.retain(|key| match steps.iter().find(|step| step.key == *key) {
                Some(step) if step.record.department_id == Some(department_id) => true,
                Some(step) => {
                    warn!(
                        "Step {} ({}) dropped from the same-assignment group of department {}: it belongs to another department",
                        step.record.step, step.record.name, department_id
                    );
                    false
                }
                None => false,
            });
        }
        self.groups.retain(|group| !group.members.is_empty());
    }

    pub(crate) fn renumber(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.record.step = index as u32 + 1;
        }
    }

    /// Forget a key in every group, dropping groups left empty.
    pub(crate) fn forget_member(&mut self, key: StepKey) {
        for group in &mut self.groups {
            group.members.remove(&key);
        }
        self.groups.retain(|group| !group.members.is_empty());
    }
}

impl From<CreateWorkflow> for WorkflowEditor {
    fn from(params: CreateWorkflow) -> Self {
        Self::new(params.name, params.description, params.output_type)
    }
}
