//! Workflow process aggregate: fetched shape and submission payload.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{FetchedSubprocess, OutputType, SameAssign, Subprocess};

/// A persisted workflow process as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowProcess {
    /// Server-assigned identifier
    pub id: u64,

    /// Name of the process
    pub name: String,

    /// What the process is for
    pub description: String,

    /// What the process produces
    pub output_type: OutputType,

    /// Ordered steps with nested departments
    #[serde(default)]
    pub subprocesses: Vec<FetchedSubprocess>,

    /// Same-assignment groups, by step number
    #[serde(default)]
    pub same_assigns: Vec<SameAssign>,

    /// Server-assigned revision counter
    #[serde(default)]
    pub version: u32,

    /// Timestamp when the process was created (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Timestamp when the process was last modified (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl WorkflowProcess {
    /// The request body that would resubmit this process unchanged.
    ///
    /// Steps are flattened and ordered by their step number; the version is
    /// not part of the payload.
    pub fn to_payload(&self) -> WorkflowPayload {
        let mut subprocesses: Vec<Subprocess> = self
            .subprocesses
            .iter()
            .cloned()
            .map(Subprocess::from)
            .collect();
        subprocesses.sort_by_key(|step| step.step);

        WorkflowPayload {
            id: Some(self.id),
            name: self.name.clone(),
            description: self.description.clone(),
            output_type: self.output_type,
            subprocesses,
            same_assigns: self.same_assigns.clone(),
        }
    }
}

/// Request body for creating or updating a workflow process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub output_type: OutputType,
    pub subprocesses: Vec<Subprocess>,
    #[serde(default)]
    pub same_assigns: Vec<SameAssign>,
}
