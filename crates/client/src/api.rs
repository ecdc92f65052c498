//! REST client for the issue tracker HTTP endpoints.
//!
//! Wraps the `/api/issues` surface using [`reqwest`]. Payloads are the same
//! DTOs the server deserializes, so the wire shape cannot drift.

use issuetrack_core::error::CoreError;
use issuetrack_core::issue::{CreateIssue, Issue, IssuePage, TechnicianUpdate, UpdateIssue};
use issuetrack_core::query::IssueListParams;
use issuetrack_core::types::DbId;
use serde::Deserialize;

/// HTTP client for one issue tracker server.
#[derive(Clone)]
pub struct IssueApi {
    client: reqwest::Client,
    base_url: String,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub db_healthy: bool,
}

/// Error body the server sends with every non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Errors from the issue tracker client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or the raw body when it is not JSON.
        message: String,
    },

    /// The payload was rejected locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),
}

impl ClientError {
    /// True when the server reported that the issue does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

impl IssueApi {
    /// Create a client for a server.
    ///
    /// * `base_url` - Server root, e.g. `http://localhost:3001`. The `/api`
    ///   prefix is added per request.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// `GET /api/issues` with optional paging, search and resolved filter.
    pub async fn list_issues(&self, params: &IssueListParams) -> Result<IssuePage, ClientError> {
        let response = self
            .client
            .get(self.url("/issues"))
            .query(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /api/issues/{id}`.
    pub async fn get_issue(&self, id: DbId) -> Result<Issue, ClientError> {
        let response = self.client.get(self.issue_url(id)).send().await?;

        Self::parse_response(response).await
    }

    /// `POST /api/issues`.
    pub async fn create_issue(&self, input: &CreateIssue) -> Result<Issue, ClientError> {
        let response = self
            .client
            .post(self.url("/issues"))
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `PUT /api/issues/{id}`. Omitted fields keep their stored value.
    pub async fn update_issue(&self, id: DbId, input: &UpdateIssue) -> Result<Issue, ClientError> {
        let response = self
            .client
            .put(self.issue_url(id))
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `PATCH /api/issues/{id}/tech`.
    pub async fn update_technician_fields(
        &self,
        id: DbId,
        input: &TechnicianUpdate,
    ) -> Result<Issue, ClientError> {
        let response = self
            .client
            .patch(format!("{}/tech", self.issue_url(id)))
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `DELETE /api/issues/{id}`.
    pub async fn delete_issue(&self, id: DbId) -> Result<(), ClientError> {
        let response = self.client.delete(self.issue_url(id)).send().await?;

        Self::check_status(response).await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn issue_url(&self, id: DbId) -> String {
        self.url(&format!("/issues/{id}"))
    }

    /// Return the response unchanged on success, or a
    /// [`ClientError::Api`] carrying the server's message on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::debug!(status = status.as_u16(), %message, "Issue API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
