//! Builder for creating and configuring WorkflowClient instances.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::info;

use super::{with_database, Backend, HttpBackend, WorkflowClient};
use crate::error::{Result, WorkflowError};

/// Default HTTP timeout for remote calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for creating and configuring WorkflowClient instances.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    database_path: Option<PathBuf>,
    api_url: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            api_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/stepwise/stepwise.db` or
    /// `~/.local/share/stepwise/stepwise.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Talk to a REST API instead of the local store. Takes precedence over
    /// the database path.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_url = Some(url);
        }
        self
    }

    /// Timeout applied to each HTTP request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the configured client instance.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Configuration` if the API URL is empty
    /// Returns `WorkflowError::FileSystem` if the database path is invalid
    /// Returns `WorkflowError::Database` if database initialization fails
    pub async fn build(self) -> Result<WorkflowClient> {
        if let Some(url) = self.api_url {
            let http = HttpBackend::new(&url, self.timeout)?;
            info!("Using workflow API at {}", http.base_url());
            return Ok(WorkflowClient::new(Backend::Remote(http)));
        }

        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Fail early on a broken store rather than on the first command
        with_database(&db_path, |_| Ok(())).await?;
        info!("Using local store at {}", db_path.display());

        Ok(WorkflowClient::new(Backend::Local { db_path }))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("stepwise")
            .place_data_file("stepwise.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
