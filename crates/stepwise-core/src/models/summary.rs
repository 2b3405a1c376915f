//! Workflow summary types and functionality.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{FetchedSubprocess, OutputType, WorkflowProcess};

/// Summary information about a workflow process with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    /// Workflow ID
    pub id: u64,
    /// Name of the workflow
    pub name: String,
    /// Description of the workflow
    pub description: String,
    /// What the workflow produces
    pub output_type: OutputType,
    /// Revision counter
    pub version: u32,
    /// Last update timestamp
    pub updated_at: Option<Timestamp>,
    /// Total number of steps
    pub total_steps: u32,
    /// Number of required steps
    pub required_steps: u32,
    /// Number of steps that carry a cost
    pub cost_steps: u32,
    /// Number of distinct departments involved
    pub departments: u32,
}

impl From<&WorkflowProcess> for WorkflowSummary {
    fn from(process: &WorkflowProcess) -> Self {
        let count = |predicate: fn(&&FetchedSubprocess) -> bool| {
            process.subprocesses.iter().filter(predicate).count() as u32
        };
        let departments: BTreeSet<u64> = process
            .subprocesses
            .iter()
            .filter_map(|step| step.resolved_department_id())
            .collect();

        Self {
            id: process.id,
            name: process.name.clone(),
            description: process.description.clone(),
            output_type: process.output_type,
            version: process.version,
            updated_at: process.updated_at,
            total_steps: process.subprocesses.len() as u32,
            required_steps: count(|step| step.is_required),
            cost_steps: count(|step| step.is_step_with_cost),
            departments: departments.len() as u32,
        }
    }
}
