//! Step operations for the WorkflowEditor.

use log::debug;

use super::{DraftStep, StepKey, WorkflowEditor};
use crate::{
    error::{Result, WorkflowError},
    models::Subprocess,
    params::{MoveStep, RemoveStep, StepInput, UpdateStep},
};

impl WorkflowEditor {
    /// Appends a new step. It becomes the last step, numbered `len`.
    /// Existing steps and groups are untouched.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Validation` - When a field is out of bounds
    pub fn add_step(&mut self, input: StepInput) -> Result<StepKey> {
        let record = input.into_subprocess(self.steps.len() as u32 + 1);
        record.validate()?;

        let key = StepKey::new();
        debug!("Adding step {} as number {}", key, record.step);
        self.steps.push(DraftStep { key, record });
        Ok(key)
    }

    /// Applies a partial update to the step at `index`.
    ///
    /// When the department changes, the step leaves the same-assignment
    /// group of its previous department.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When `index` is out of range
    /// * `WorkflowError::Validation` - When the updated step is invalid
    pub fn update_step(&mut self, params: &UpdateStep) -> Result<&Subprocess> {
        let index = self.check_index("index", params.index)?;
        let current = &self.steps[index];
        let updated = params.apply_to(&current.record)?;
        updated.validate()?;

        let key = current.key;
        let department_changed = updated.department_id != current.record.department_id;
        self.steps[index].record = updated;

        if department_changed {
            debug!("Step {key} changed department, leaving its previous group");
            self.forget_member(key);
        }
        Ok(&self.steps[index].record)
    }

    /// Removes the step at `index` and renumbers the remaining steps.
    ///
    /// The removed step is dropped from every group, and groups left empty
    /// are dropped. Surviving members keep their identity, so their numbers
    /// follow the renumbering.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When `index` is out of range
    pub fn remove_step(&mut self, params: &RemoveStep) -> Result<DraftStep> {
        let index = self.check_index("index", params.index)?;
        let removed = self.steps.remove(index);
        self.renumber();
        self.forget_member(removed.key);
        debug!("Removed step {} from position {}", removed.key, index);
        Ok(removed)
    }

    /// Moves the step at `from` to `to` (drag and drop), shifting the steps
    /// in between by one, then renumbers.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When either index is out of range
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index("from", from)?;
        self.check_index("to", to)?;
        if from == to {
            return Ok(());
        }

        let step = self.steps.remove(from);
        self.steps.insert(to, step);
        self.renumber();
        Ok(())
    }

    /// Parameter-struct form of [`WorkflowEditor::move_step`].
    pub fn move_step_with(&mut self, params: &MoveStep) -> Result<()> {
        self.move_step(params.from, params.to)
    }

    fn check_index(&self, field: &str, index: usize) -> Result<usize> {
        if index < self.steps.len() {
            Ok(index)
        } else {
            Err(WorkflowError::invalid_input(field).with_reason(format!(
                "Index {index} is out of range. Workflow has {} steps",
                self.steps.len()
            )))
        }
    }
}
