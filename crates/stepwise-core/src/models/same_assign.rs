//! Same-assignment group wire shape.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Steps of one department that are handled by the same assignee,
/// referenced by step number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SameAssign {
    pub department_id: u64,
    pub steps: BTreeSet<u32>,
}

impl SameAssign {
    pub fn new(department_id: u64, steps: impl IntoIterator<Item = u32>) -> Self {
        Self {
            department_id,
            steps: steps.into_iter().collect(),
        }
    }
}
