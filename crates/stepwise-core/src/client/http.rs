//! REST backend reached over HTTP.

use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    error::{HttpResultExt, Result, WorkflowError},
    models::{Department, Page, WorkflowPayload, WorkflowProcess},
};

const DEPARTMENTS_PATH: &str = "departments";
const WORKFLOWS_PATH: &str = "workflowProcesses";

/// Listing bodies arrive either paginated or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

impl<T> From<Listing<T>> for Page<T> {
    fn from(listing: Listing<T>) -> Self {
        match listing {
            Listing::Page(page) => page,
            Listing::Items(items) => Page::complete(items),
        }
    }
}

/// Client for the workflow REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(WorkflowError::Configuration {
                message: "API URL must not be empty".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .http_context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn listing_url(&self, path: &str, limit: Option<u32>) -> String {
        match limit {
            Some(limit) => format!("{}?limit={limit}", self.url(path)),
            None => self.url(path),
        }
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .http_context(&format!("Failed to {action}"))?;
        debug!("{action}: {}", response.status());
        Ok(response)
    }

    /// Turn a non-success response into `WorkflowError::Backend`.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(WorkflowError::Backend {
            status: status.as_u16(),
            message: error_message(&body, status),
        })
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        Self::check(response)
            .await?
            .json::<T>()
            .await
            .http_context("Failed to decode response body")
    }

    pub async fn list_departments(&self, limit: Option<u32>) -> Result<Page<Department>> {
        let request = self.client.get(self.listing_url(DEPARTMENTS_PATH, limit));
        let response = self.send(request, "list departments").await?;
        Ok(Self::read::<Listing<Department>>(response).await?.into())
    }

    pub async fn create_department(&self, name: &str) -> Result<Department> {
        let request = self
            .client
            .post(self.url(DEPARTMENTS_PATH))
            .json(&json!({ "name": name }));
        let response = self.send(request, "create department").await?;
        Self::read(response).await
    }

    pub async fn list_workflows(&self, limit: Option<u32>) -> Result<Page<WorkflowProcess>> {
        let request = self.client.get(self.listing_url(WORKFLOWS_PATH, limit));
        let response = self.send(request, "list workflow processes").await?;
        Ok(Self::read::<Listing<WorkflowProcess>>(response).await?.into())
    }

    /// Fetches one workflow process; a 404 is reported as `None`.
    pub async fn get_workflow(&self, id: u64) -> Result<Option<WorkflowProcess>> {
        let request = self.client.get(self.url(&format!("{WORKFLOWS_PATH}/{id}")));
        let response = self.send(request, "fetch workflow process").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read(response).await.map(Some)
    }

    pub async fn create_workflow(&self, payload: &WorkflowPayload) -> Result<WorkflowProcess> {
        let request = self.client.post(self.url(WORKFLOWS_PATH)).json(payload);
        let response = self.send(request, "create workflow process").await?;
        Self::read(response).await
    }

    pub async fn update_workflow(
        &self,
        id: u64,
        payload: &WorkflowPayload,
    ) -> Result<WorkflowProcess> {
        let request = self
            .client
            .put(self.url(&format!("{WORKFLOWS_PATH}/{id}")))
            .json(payload);
        let response = self.send(request, "update workflow process").await?;
        Self::read(response).await
    }

    pub async fn delete_workflow(&self, id: u64) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("{WORKFLOWS_PATH}/{id}")));
        let response = self.send(request, "delete workflow process").await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// The backend's `message` field (a string, or a list joined with ", "),
/// else the raw body, else the status reason.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Array(messages)) => Some(
                messages
                    .iter()
                    .map(|message| match message {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        });

    from_json
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}
