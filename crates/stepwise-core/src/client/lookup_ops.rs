//! Reference data for the WorkflowClient: departments and field tags.

use super::{with_database, Backend, WorkflowClient};
use crate::{
    display::{Departments, FieldTags},
    error::Result,
    models::{Department, FieldTag},
    params::{CreateDepartment, ListDepartments},
};

impl WorkflowClient {
    /// Departments that steps can be assigned to.
    pub async fn list_departments(&self, params: &ListDepartments) -> Result<Departments> {
        let limit = params.limit;
        let page = match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.list_departments(limit)).await?
            }
            Backend::Remote(http) => http.list_departments(limit).await?,
        };
        Ok(Departments(page.items))
    }

    /// Adds a department.
    pub async fn add_department(&self, params: &CreateDepartment) -> Result<Department> {
        let name = params.name.clone();
        match &self.backend {
            Backend::Local { db_path } => {
                with_database(db_path, move |db| db.create_department(&name)).await
            }
            Backend::Remote(http) => http.create_department(&name).await,
        }
    }

    /// The field-tag catalog offered for a step's `checkFields`.
    pub fn field_tags(&self) -> FieldTags {
        FieldTags(FieldTag::catalog().to_vec())
    }
}
