//! High-level client for workflow definitions.
//!
//! The [`WorkflowClient`] is the one place that talks to a backend. It is
//! built by [`ClientBuilder`] against either the local SQLite store or a
//! remote REST API, and every operation dispatches on that choice:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌──────────────────────┐
//! │    Handlers     │    │   Operations    │    │  Local: db/ (sqlite) │
//! │ (workflow_      │───▶│ (workflow_ops,  │───▶│  Remote: http.rs     │
//! │  handlers)      │    │  lookup_ops)    │    │                      │
//! └─────────────────┘    └─────────────────┘    └──────────────────────┘
//! ```
//!
//! Editing never goes through the client: a [`crate::editor::WorkflowEditor`]
//! is filled by [`WorkflowClient::open_editor`], edited in memory, and handed
//! back to [`WorkflowClient::submit`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use stepwise_core::{client::ClientBuilder, params::Id};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientBuilder::new()
//!     .with_database_path(Some("/tmp/stepwise.db"))
//!     .build()
//!     .await?;
//!
//! let mut editor = client.open_editor(&Id { id: 1 }).await?;
//! editor.move_step(2, 0)?;
//! let submission = client.submit(&editor).await?;
//! println!("{}", submission.process().version);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::Database,
    error::{Result, WorkflowError},
};

pub mod builder;
pub mod http;
pub mod lookup_ops;
pub mod workflow_handlers;
pub mod workflow_ops;


pub use builder::ClientBuilder;
pub use http::HttpBackend;
pub use workflow_handlers::Submission;

/// Where workflow definitions are persisted.
#[derive(Debug, Clone)]
pub(crate) enum Backend {
    /// SQLite file, opened per call
    Local { db_path: PathBuf },
    /// REST API
    Remote(HttpBackend),
}

/// Main client interface for workflow definitions and reference data.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    pub(crate) backend: Backend,
}

impl WorkflowClient {
    pub(crate) fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Whether calls go to a remote API.
    pub fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    /// Human-readable name of the backend, for logs.
    pub fn backend_name(&self) -> String {
        match &self.backend {
            Backend::Local { db_path } => format!("local store {}", db_path.display()),
            Backend::Remote(http) => format!("API {}", http.base_url()),
        }
    }
}

/// Run a store operation on the blocking pool with a fresh connection.
pub(crate) async fn with_database<T, F>(db_path: &Path, operation: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
{
    let db_path = db_path.to_path_buf();
    task::spawn_blocking(move || {
        let mut db = Database::new(&db_path)?;
        operation(&mut db)
    })
    .await
    .map_err(|e| WorkflowError::Configuration {
        message: format!("Task join error: {e}"),
    })?
}
