//! Workflow handler operations that return editor and display types for the
//! WorkflowClient.

use log::info;

use super::WorkflowClient;
use crate::{
    display::WorkflowSummaries,
    editor::WorkflowEditor,
    error::{Result, WorkflowError},
    models::{WorkflowFilter, WorkflowProcess, WorkflowSummary},
    params::{DeleteWorkflow, Id, ListWorkflows},
};

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The editor had no id; the backend created the process
    Created(WorkflowProcess),
    /// The editor had an id; the backend replaced that process
    Updated(WorkflowProcess),
}

impl Submission {
    /// The persisted process as returned by the backend.
    pub fn process(&self) -> &WorkflowProcess {
        match self {
            Submission::Created(process) | Submission::Updated(process) => process,
        }
    }

    pub fn into_process(self) -> WorkflowProcess {
        match self {
            Submission::Created(process) | Submission::Updated(process) => process,
        }
    }
}

impl WorkflowClient {
    /// Handle listing workflow processes as summaries.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When the output type filter is not
    ///   a known output type
    pub async fn list_workflows_summary(&self, params: &ListWorkflows) -> Result<WorkflowSummaries> {
        let filter = WorkflowFilter {
            output_type: params.parsed_output_type()?,
            name_contains: params.name.clone(),
            limit: params.limit,
        };
        let processes = self.list_workflows(filter).await?;
        let summaries: Vec<WorkflowSummary> = processes.iter().map(Into::into).collect();
        Ok(WorkflowSummaries(summaries))
    }

    /// Fetch a workflow process and hydrate an editor from it.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::WorkflowNotFound` - When no process has this id
    pub async fn open_editor(&self, params: &Id) -> Result<WorkflowEditor> {
        let process = self
            .get_workflow(params)
            .await?
            .ok_or(WorkflowError::WorkflowNotFound { id: params.id })?;
        info!(
            "Opened workflow process {} (version {}) with {} steps",
            process.id,
            process.version,
            process.subprocesses.len()
        );
        Ok(WorkflowEditor::from_process(process))
    }

    /// Build, validate and persist the editor's workflow definition.
    ///
    /// An editor without an id is created, one with an id replaces the
    /// stored process. Validation runs before any backend call. The editor
    /// is only borrowed, so after a failure it still holds every edit and
    /// can be resubmitted.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Validation` - When the payload is invalid; nothing
    ///   is sent
    /// * Any backend error from the create or update call
    pub async fn submit(&self, editor: &WorkflowEditor) -> Result<Submission> {
        let payload = editor.to_payload()?;
        let submission = match payload.id {
            None => Submission::Created(self.create_workflow(payload).await?),
            Some(id) => Submission::Updated(self.update_workflow(id, payload).await?),
        };

        let process = submission.process();
        info!(
            "Submitted workflow process {} (version {})",
            process.id, process.version
        );
        Ok(submission)
    }

    /// Handle deleting a workflow process. Refused unless confirmed.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When the deletion is not confirmed
    /// * `WorkflowError::WorkflowNotFound` - When no process has this id
    pub async fn delete_workflow(&self, params: &DeleteWorkflow) -> Result<WorkflowProcess> {
        if !params.confirmed {
            return Err(WorkflowError::invalid_input("confirm")
                .with_reason("deleting a workflow process cannot be undone and must be confirmed"));
        }
        self.remove_workflow(&Id { id: params.id }).await
    }
}
