//! Workflow process operations for the WorkflowClient.

use log::debug;

use super::{with_database, Backend, WorkflowClient};
use crate::{
    error::{Result, WorkflowError},
    models::{WorkflowFilter, WorkflowPayload, WorkflowProcess},
    params::Id,
};

impl WorkflowClient {
    /// Lists workflow processes matching the filter.
    ///
    /// The remote API only pages, so output-type and name conditions are
    /// applied here. With conditions set, the whole listing is requested and
    /// the limit applies to the matching processes.
    pub async fn list_workflows(&self, filter: WorkflowFilter) -> Result<Vec<WorkflowProcess>> {
        match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.list_workflows(&filter))
                    .await
                    .map(|page| page.items)
            }
            Backend::Remote(http) => {
                if !filter.has_conditions() {
                    return Ok(http.list_workflows(filter.limit).await?.items);
                }
                let mut items = http.list_workflows(None).await?.items;
                items.retain(|process| filter.matches(process));
                if let Some(limit) = filter.limit {
                    items.truncate(limit as usize);
                }
                debug!("{} workflow processes match the filter", items.len());
                Ok(items)
            }
        }
    }

    /// Retrieves a workflow process by its ID.
    pub async fn get_workflow(&self, params: &Id) -> Result<Option<WorkflowProcess>> {
        let id = params.id;
        match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.get_workflow(id)).await
            }
            Backend::Remote(http) => http.get_workflow(id).await,
        }
    }

    /// Creates a workflow process from a payload.
    pub async fn create_workflow(&self, payload: WorkflowPayload) -> Result<WorkflowProcess> {
        debug!(
            "Creating workflow process '{}' with {} steps",
            payload.name,
            payload.subprocesses.len()
        );
        match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.create_workflow(&payload)).await
            }
            Backend::Remote(http) => http.create_workflow(&payload).await,
        }
    }

    /// Replaces the workflow process with the given id.
    pub async fn update_workflow(
        &self,
        id: u64,
        payload: WorkflowPayload,
    ) -> Result<WorkflowProcess> {
        debug!("Updating workflow process {id}");
        match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.update_workflow(id, &payload)).await
            }
            Backend::Remote(http) => http.update_workflow(id, &payload).await,
        }
    }

    /// Permanently deletes a workflow process and returns what was deleted.
    pub async fn remove_workflow(&self, params: &Id) -> Result<WorkflowProcess> {
        let id = params.id;
        match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.delete_workflow(id)).await
            }
            Backend::Remote(http) => {
                let process = http
                    .get_workflow(id)
                    .await?
                    .ok_or(WorkflowError::WorkflowNotFound { id })?;
                http.delete_workflow(id).await?;
                Ok(process)
            }
        }
    }
}
