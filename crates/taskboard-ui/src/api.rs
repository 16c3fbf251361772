//! REST client for the task service.
//!
//! Wraps outbound HTTP with JSON encoding/decoding, attaches the bearer
//! token from the session store, and classifies failures by outcome:
//! a non-success status is a definite failure, a transport error leaves
//! the outcome unknown. Callers decide what to do with each class.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use taskboard_types::{ErrorBody, SortKey, StatusFilter, Task, TaskCreate, TaskUpdate};

/// Failure from a task service call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the credentials (HTTP 401).
    #[error("not authenticated")]
    Unauthorized,
    /// The server answered with a non-success status. The request definitely
    /// did not take effect.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// The request never completed. The server may or may not have applied it.
    #[error("network error: {0}")]
    Transport(String),
    /// The server reported success but the body did not parse.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// True when the server may have applied the change even though no
    /// response was observed.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// HTTP client for the task service.
///
/// Cheap to clone; clones share the underlying connection pool and the
/// token handle.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    /// Shared with the session store; read per-request for the bearer header.
    token: Arc<Mutex<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Arc<Mutex<Option<String>>>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        let token = self.token.lock().ok().and_then(|guard| guard.clone());
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`Self::send`] but for endpoints answering 204 with no body.
    async fn send_no_content(req: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        Ok(())
    }

    // =========================================================================
    // TASK ENDPOINTS
    // =========================================================================

    pub async fn list_tasks(
        &self,
        filter: StatusFilter,
        sort: SortKey,
    ) -> Result<Vec<Task>, ApiError> {
        Self::send(self.request(reqwest::Method::GET, &list_path(filter, sort))).await
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, ApiError> {
        Self::send(self.request(reqwest::Method::GET, &format!("/tasks/{id}"))).await
    }

    pub async fn create_task(&self, task: &TaskCreate) -> Result<Task, ApiError> {
        Self::send(self.request(reqwest::Method::POST, "/tasks").json(task)).await
    }

    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiError> {
        Self::send(
            self.request(reqwest::Method::PUT, &format!("/tasks/{id}"))
                .json(update),
        )
        .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        Self::send_no_content(self.request(reqwest::Method::DELETE, &format!("/tasks/{id}"))).await
    }

    pub async fn toggle_task(&self, id: i64) -> Result<Task, ApiError> {
        Self::send(
            self.request(reqwest::Method::PATCH, &format!("/tasks/{id}/complete"))
                .json(&serde_json::json!({})),
        )
        .await
    }
}

/// Path and query string for the list endpoint.
fn list_path(filter: StatusFilter, sort: SortKey) -> String {
    format!("/tasks?status={}&sort={}", filter.as_str(), sort.as_str())
}

/// Map a non-success status plus its body into a typed error. The service
/// sends `{"detail": "..."}`; anything else falls back to the bare status.
fn classify_status(status: u16, body: &str) -> ApiError {
    if status == 401 {
        return ApiError::Unauthorized;
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| format!("HTTP {status}"));
    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_path_carries_filter_and_sort() {
        assert_eq!(
            list_path(StatusFilter::Pending, SortKey::Title),
            "/tasks?status=pending&sort=title"
        );
        assert_eq!(
            list_path(StatusFilter::All, SortKey::Created),
            "/tasks?status=all&sort=created"
        );
    }

    #[test]
    fn test_classify_status_unauthorized() {
        assert_eq!(classify_status(401, ""), ApiError::Unauthorized);
    }

    #[test]
    fn test_classify_status_reads_service_detail() {
        let err = classify_status(404, r#"{"detail":"Task not found"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "Task not found".to_string()
            }
        );
    }

    #[test]
    fn test_classify_status_falls_back_on_opaque_body() {
        let err = classify_status(500, "<html>Internal Server Error</html>");
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "HTTP 500".to_string()
            }
        );
    }

    #[test]
    fn test_only_transport_is_unknown_outcome() {
        assert!(ApiError::Transport("connection refused".to_string()).outcome_unknown());
        assert!(!ApiError::Unauthorized.outcome_unknown());
        assert!(!ApiError::Status {
            status: 500,
            message: String::new()
        }
        .outcome_unknown());
        assert!(!ApiError::Decode("eof".to_string()).outcome_unknown());
    }
}
