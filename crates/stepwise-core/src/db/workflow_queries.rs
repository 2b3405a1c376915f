//! Workflow process CRUD operations and queries.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, OptionalExtension, Row, ToSql, Transaction};

use super::{
    department_queries::ensure_department,
    utils::{
        check_fields_column, encode_check_fields, encode_timestamp, id_column,
        optional_id_column, output_type_column, timestamp_column,
    },
};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{
        Department, FetchedSubprocess, Page, SameAssign, WorkflowFilter, WorkflowPayload,
        WorkflowProcess,
    },
};

const INSERT_WORKFLOW_SQL: &str = "INSERT INTO workflow_processes (name, description, output_type, version, created_at, updated_at) VALUES (?1, ?2, ?3, 1, ?4, ?4)";
const UPDATE_WORKFLOW_SQL: &str = "UPDATE workflow_processes SET name = ?1, description = ?2, output_type = ?3, version = version + 1, updated_at = ?4 WHERE id = ?5";
const SELECT_WORKFLOW_SQL: &str = "SELECT id, name, description, output_type, version, created_at, updated_at FROM workflow_processes WHERE id = ?1";
const CHECK_WORKFLOW_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM workflow_processes WHERE id = ?1)";
const DELETE_WORKFLOW_SQL: &str = "DELETE FROM workflow_processes WHERE id = ?1";

const SELECT_STEP_IDS_SQL: &str = "SELECT id FROM subprocesses WHERE workflow_id = ?1";
const DELETE_STEPS_SQL: &str = "DELETE FROM subprocesses WHERE workflow_id = ?1";
const INSERT_STEP_SQL: &str = "INSERT INTO subprocesses (id, workflow_id, name, description, estimated_number_of_days, number_of_days_before_deadline, role_of_the_person_in_charge, department_id, is_required, is_step_with_cost, check_fields, is_show_request_material, step) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
const SELECT_STEPS_SQL: &str = "SELECT s.id, s.name, s.description, s.estimated_number_of_days, s.number_of_days_before_deadline, s.role_of_the_person_in_charge, s.department_id, d.name, s.is_required, s.is_step_with_cost, s.check_fields, s.is_show_request_material, s.step FROM subprocesses s LEFT JOIN departments d ON d.id = s.department_id WHERE s.workflow_id = ?1 ORDER BY s.step";

const DELETE_GROUPS_SQL: &str = "DELETE FROM same_assigns WHERE workflow_id = ?1";
const INSERT_GROUP_MEMBER_SQL: &str =
    "INSERT INTO same_assigns (workflow_id, department_id, step) VALUES (?1, ?2, ?3)";
const SELECT_GROUPS_SQL: &str = "SELECT department_id, step FROM same_assigns WHERE workflow_id = ?1 ORDER BY department_id, step";

const WORKFLOW_COLUMNS: &str = "id, name, description, output_type, version, created_at, updated_at";

impl super::Database {
    fn build_workflow_from_row(row: &Row<'_>) -> rusqlite::Result<WorkflowProcess> {
        Ok(WorkflowProcess {
            id: id_column(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            output_type: output_type_column(row, 3)?,
            subprocesses: Vec::new(),
            same_assigns: Vec::new(),
            version: row.get::<_, i64>(4)? as u32,
            created_at: Some(timestamp_column(row, 5)?),
            updated_at: Some(timestamp_column(row, 6)?),
        })
    }

    fn build_step_from_row(row: &Row<'_>) -> rusqlite::Result<FetchedSubprocess> {
        let department_id = optional_id_column(row, 6)?;
        let department_name: Option<String> = row.get(7)?;
        let department = department_id
            .zip(department_name)
            .map(|(id, name)| Department { id, name });

        Ok(FetchedSubprocess {
            id: Some(id_column(row, 0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            estimated_number_of_days: row.get::<_, i64>(3)? as u32,
            number_of_days_before_deadline: row.get::<_, i64>(4)? as u32,
            role_of_the_person_in_charge: row.get(5)?,
            department,
            department_id: None,
            is_required: row.get(8)?,
            is_step_with_cost: row.get(9)?,
            check_fields: check_fields_column(row, 10)?,
            is_show_request_material: row.get(11)?,
            step: row.get::<_, i64>(12)? as u32,
        })
    }

    /// Creates a workflow process from a validated payload. The store assigns
    /// every id and starts the version at 1.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Validation` - When the payload is invalid
    /// * `WorkflowError::DepartmentNotFound` - When a step or group names an
    ///   unknown department
    pub fn create_workflow(&mut self, payload: &WorkflowPayload) -> Result<WorkflowProcess> {
        payload.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        Self::check_departments(&tx, payload)?;

        let now = encode_timestamp(Timestamp::now());
        tx.execute(
            INSERT_WORKFLOW_SQL,
            params![
                payload.name,
                payload.description,
                payload.output_type.as_wire(),
                &now
            ],
        )
        .db_context("Failed to insert workflow process")?;
        let id = tx.last_insert_rowid() as u64;

        Self::write_children(&tx, id, payload, &HashSet::new())?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!(
            "Created workflow process {id} with {} steps",
            payload.subprocesses.len()
        );

        self.get_workflow(id)?
            .ok_or(WorkflowError::WorkflowNotFound { id })
    }

    /// Replaces a workflow process with a validated payload and bumps its
    /// version.
    ///
    /// Step ids from the payload are kept when they belong to this process;
    /// other steps receive new ids.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Validation` - When the payload is invalid
    /// * `WorkflowError::WorkflowNotFound` - When no process has this id
    /// * `WorkflowError::DepartmentNotFound` - When a step or group names an
    ///   unknown department
    pub fn update_workflow(&mut self, id: u64, payload: &WorkflowPayload) -> Result<WorkflowProcess> {
        payload.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_WORKFLOW_EXISTS_SQL, params![id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check workflow existence")?;
        if !exists {
            return Err(WorkflowError::WorkflowNotFound { id });
        }

        Self::check_departments(&tx, payload)?;

        let existing_ids: HashSet<u64> = {
            let mut stmt = tx
                .prepare(SELECT_STEP_IDS_SQL)
                .db_context("Failed to prepare query")?;
            let ids = stmt
                .query_map(params![id as i64], |row| id_column(row, 0))
                .db_context("Failed to query step ids")?
                .collect::<std::result::Result<HashSet<_>, _>>()
                .db_context("Failed to fetch step ids")?;
            ids
        };

        tx.execute(
            UPDATE_WORKFLOW_SQL,
            params![
                payload.name,
                payload.description,
                payload.output_type.as_wire(),
                encode_timestamp(Timestamp::now()),
                id as i64
            ],
        )
        .db_context("Failed to update workflow process")?;

        tx.execute(DELETE_GROUPS_SQL, params![id as i64])
            .db_context("Failed to delete same-assignment groups")?;
        tx.execute(DELETE_STEPS_SQL, params![id as i64])
            .db_context("Failed to delete steps")?;

        Self::write_children(&tx, id, payload, &existing_ids)?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!("Updated workflow process {id}");

        self.get_workflow(id)?
            .ok_or(WorkflowError::WorkflowNotFound { id })
    }

    /// Retrieves a workflow process with its steps and groups.
    pub fn get_workflow(&self, id: u64) -> Result<Option<WorkflowProcess>> {
        let workflow = self
            .connection
            .query_row(SELECT_WORKFLOW_SQL, params![id as i64], Self::build_workflow_from_row)
            .optional()
            .db_context("Failed to query workflow process")?;

        match workflow {
            Some(mut workflow) => {
                self.load_children(&mut workflow)?;
                Ok(Some(workflow))
            }
            None => Ok(None),
        }
    }

    /// Lists workflow processes, most recently updated first. `total` counts
    /// every match, regardless of `limit`.
    pub fn list_workflows(&self, filter: &WorkflowFilter) -> Result<Page<WorkflowProcess>> {
        let mut query = format!("SELECT {WORKFLOW_COLUMNS} FROM workflow_processes");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(output_type) = filter.output_type {
            conditions.push("output_type = ?");
            params_vec.push(Box::new(output_type.as_wire()));
        }

        if let Some(ref name) = filter.name_contains {
            conditions.push("name LIKE ?");
            params_vec.push(Box::new(format!("%{name}%")));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        // Rows written with variable precision still order by time
        query.push_str(" ORDER BY julianday(updated_at) DESC, updated_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut workflows = stmt
            .query_map(&params_refs[..], Self::build_workflow_from_row)
            .db_context("Failed to query workflow processes")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch workflow processes")?;

        let total = workflows.len() as u64;
        if let Some(limit) = filter.limit {
            workflows.truncate(limit as usize);
        }

        for workflow in &mut workflows {
            self.load_children(workflow)?;
        }

        Ok(Page {
            items: workflows,
            total: Some(total),
        })
    }

    /// Permanently deletes a workflow process with its steps and groups.
    /// Returns the deleted process.
    pub fn delete_workflow(&mut self, id: u64) -> Result<WorkflowProcess> {
        let workflow = self
            .get_workflow(id)?
            .ok_or(WorkflowError::WorkflowNotFound { id })?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(DELETE_GROUPS_SQL, params![id as i64])
            .db_context("Failed to delete same-assignment groups")?;
        tx.execute(DELETE_STEPS_SQL, params![id as i64])
            .db_context("Failed to delete steps")?;
        tx.execute(DELETE_WORKFLOW_SQL, params![id as i64])
            .db_context("Failed to delete workflow process")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(workflow)
    }

    fn load_children(&self, workflow: &mut WorkflowProcess) -> Result<()> {
        let workflow_id = workflow.id as i64;

        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_SQL)
            .db_context("Failed to prepare query")?;
        workflow.subprocesses = stmt
            .query_map(params![workflow_id], Self::build_step_from_row)
            .db_context("Failed to query steps")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch steps")?;

        let mut stmt = self
            .connection
            .prepare(SELECT_GROUPS_SQL)
            .db_context("Failed to prepare query")?;
        let members = stmt
            .query_map(params![workflow_id], |row| {
                Ok((id_column(row, 0)?, row.get::<_, i64>(1)? as u32))
            })
            .db_context("Failed to query same-assignment groups")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch same-assignment groups")?;

        let mut groups: BTreeMap<u64, BTreeSet<u32>> = BTreeMap::new();
        for (department_id, step) in members {
            groups.entry(department_id).or_default().insert(step);
        }
        workflow.same_assigns = groups
            .into_iter()
            .map(|(department_id, steps)| SameAssign {
                department_id,
                steps,
            })
            .collect();

        Ok(())
    }

    fn check_departments(tx: &Transaction<'_>, payload: &WorkflowPayload) -> Result<()> {
        let referenced: BTreeSet<u64> = payload
            .subprocesses
            .iter()
            .filter_map(|step| step.department_id)
            .chain(payload.same_assigns.iter().map(|group| group.department_id))
            .collect();

        for department_id in referenced {
            ensure_department(tx, department_id)?;
        }
        Ok(())
    }

    fn write_children(
        tx: &Transaction<'_>,
        workflow_id: u64,
        payload: &WorkflowPayload,
        reusable_ids: &HashSet<u64>,
    ) -> Result<()> {
        for step in &payload.subprocesses {
            let id = step
                .id
                .filter(|id| reusable_ids.contains(id))
                .map(|id| id as i64);
            let check_fields = encode_check_fields(step.check_fields.as_ref())?;

            tx.execute(
                INSERT_STEP_SQL,
                params![
                    id,
                    workflow_id as i64,
                    step.name,
                    step.description,
                    step.estimated_number_of_days,
                    step.number_of_days_before_deadline,
                    step.role_of_the_person_in_charge,
                    step.department_id.map(|id| id as i64),
                    step.is_required,
                    step.is_step_with_cost,
                    check_fields,
                    step.is_show_request_material,
                    step.step
                ],
            )
            .db_context("Failed to insert step")?;
        }

        for group in &payload.same_assigns {
            for step in &group.steps {
                tx.execute(
                    INSERT_GROUP_MEMBER_SQL,
                    params![workflow_id as i64, group.department_id as i64, step],
                )
                .db_context("Failed to insert same-assignment group")?;
            }
        }

        Ok(())
    }
}
