//! Department queries.

use jiff::Timestamp;
use rusqlite::{params, Transaction};

use super::utils::{encode_timestamp, id_column};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{Department, Page},
    validation::TEXT_LENGTH,
};

const INSERT_DEPARTMENT_SQL: &str = "INSERT INTO departments (name, created_at) VALUES (?1, ?2)";
const SELECT_DEPARTMENTS_SQL: &str = "SELECT id, name FROM departments ORDER BY name, id";
const COUNT_DEPARTMENTS_SQL: &str = "SELECT COUNT(*) FROM departments";
const CHECK_DEPARTMENT_NAME_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM departments WHERE name = ?1 COLLATE NOCASE)";
const CHECK_DEPARTMENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?1)";

impl super::Database {
    /// Adds a department. Names are unique, ignoring case.
    pub fn create_department(&mut self, name: &str) -> Result<Department> {
        let name = name.trim();
        let length = name.chars().count();
        if !TEXT_LENGTH.contains(&length) {
            return Err(WorkflowError::invalid_input("name").with_reason(format!(
                "must be between {} and {} characters",
                TEXT_LENGTH.start(),
                TEXT_LENGTH.end()
            )));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let taken: bool = tx
            .query_row(CHECK_DEPARTMENT_NAME_SQL, params![name], |row| row.get(0))
            .db_context("Failed to check department name")?;
        if taken {
            return Err(WorkflowError::invalid_input("name")
                .with_reason(format!("department '{name}' already exists")));
        }

        tx.execute(
            INSERT_DEPARTMENT_SQL,
            params![name, encode_timestamp(Timestamp::now())],
        )
        .db_context("Failed to insert department")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Department {
            id,
            name: name.to_string(),
        })
    }

    /// Lists departments ordered by name. `total` counts all departments,
    /// regardless of `limit`.
    pub fn list_departments(&self, limit: Option<u32>) -> Result<Page<Department>> {
        let total: i64 = self
            .connection
            .query_row(COUNT_DEPARTMENTS_SQL, [], |row| row.get(0))
            .db_context("Failed to count departments")?;

        let mut stmt = self
            .connection
            .prepare(SELECT_DEPARTMENTS_SQL)
            .db_context("Failed to prepare query")?;

        let mut items = stmt
            .query_map([], |row| {
                Ok(Department {
                    id: id_column(row, 0)?,
                    name: row.get(1)?,
                })
            })
            .db_context("Failed to query departments")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch departments")?;

        if let Some(limit) = limit {
            items.truncate(limit as usize);
        }

        Ok(Page {
            items,
            total: Some(total as u64),
        })
    }
}

/// Fails with `DepartmentNotFound` unless the department exists.
pub(super) fn ensure_department(tx: &Transaction<'_>, id: u64) -> Result<()> {
    let exists: bool = tx
        .query_row(CHECK_DEPARTMENT_EXISTS_SQL, params![id as i64], |row| {
            row.get(0)
        })
        .db_context("Failed to check department existence")?;

    if exists {
        Ok(())
    } else {
        Err(WorkflowError::DepartmentNotFound { id })
    }
}
