//! Database schema initialization and migrations.

use log::info;

use crate::error::{DatabaseResultExt, Result, WorkflowError};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Cascading deletes rely on this being set per connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Stores created before the material-request flag existed
        let has_material_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('subprocesses') WHERE name = 'is_show_request_material'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_material_column {
            info!("Migrating subprocesses table: adding is_show_request_material");
            self.connection
                .execute(
                    "ALTER TABLE subprocesses ADD COLUMN is_show_request_material INTEGER",
                    [],
                )
                .map_err(|e| {
                    WorkflowError::database("Failed to add is_show_request_material column")
                        .with_source(e)
                })?;
        }

        Ok(())
    }
}
