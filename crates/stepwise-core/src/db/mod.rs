//! SQLite storage for workflow processes and departments.
//!
//! The local store plays the role of the backend when no API URL is
//! configured: it assigns ids, bumps versions, and checks the same
//! invariants a remote backend would before accepting a payload.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod department_queries;
pub mod migrations;
pub mod utils;
pub mod workflow_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
