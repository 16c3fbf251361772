//! Shared API Types for Taskboard
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the HTTP
//! boundary between the UI and the task service.
//!
//! ## Boundary
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Task service    │  JSON   │  WASM UI         │
//! │  (remote REST)   │ ◄─────► │  (egui)          │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. All boundary types live here - no inline struct definitions in the client
//! 2. Field names match the service's JSON exactly (snake_case)
//! 3. Client-side validation limits live next to the types they protect

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION LIMITS
// ============================================================================

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Client-side validation failure for task fields.
///
/// Messages are user-facing; the UI renders them verbatim next to the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be between 1 and 200 characters")]
    TitleTooLong,
    #[error("Description must be no more than 1000 characters")]
    DescriptionTooLong,
}

/// Validate a task title: non-blank, at most [`TITLE_MAX_CHARS`] characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Validate an optional description: at most [`DESCRIPTION_MAX_CHARS`] characters.
pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::DescriptionTooLong);
        }
    }
    Ok(())
}

// ============================================================================
// TASK API
// ============================================================================

/// A user-owned to-do item as the service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

/// Request body for `PUT /tasks/{id}`. `None` fields are omitted from the
/// JSON and left unchanged by the service; an empty string clears the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        validate_description(self.description.as_deref())
    }
}

// ============================================================================
// LIST QUERY
// ============================================================================

/// Completion filter for `GET /tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Pending,
        StatusFilter::Completed,
    ];

    /// Wire value for the `status` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }
}

/// Sort order for `GET /tasks`. `Created` means newest first (service
/// semantics); `Title` is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Created,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Created, SortKey::Title];

    /// Wire value for the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Title => "title",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Created => "Created Date",
            SortKey::Title => "Title",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error body the service sends with non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_rejects_blank() {
        assert_eq!(validate_title(""), Err(ValidationError::TitleRequired));
        assert_eq!(validate_title("   "), Err(ValidationError::TitleRequired));
        assert!(validate_title("buy milk").is_ok());
    }

    #[test]
    fn test_validate_title_length_boundary() {
        let at_limit: String = "x".repeat(TITLE_MAX_CHARS);
        let over_limit: String = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(validate_title(&at_limit).is_ok());
        assert_eq!(
            validate_title(&over_limit),
            Err(ValidationError::TitleTooLong)
        );
    }

    #[test]
    fn test_validate_description_length_boundary() {
        let at_limit: String = "y".repeat(DESCRIPTION_MAX_CHARS);
        let over_limit: String = "y".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some(&at_limit)).is_ok());
        assert_eq!(
            validate_description(Some(&over_limit)),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_task_deserializes_service_json() {
        let json = r#"{
            "id": 7,
            "user_id": "user-42",
            "title": "Sample Task",
            "description": "A sample",
            "completed": false,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:30:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).expect("task json");
        assert_eq!(task.id, 7);
        assert_eq!(task.user_id, "user-42");
        assert_eq!(task.description.as_deref(), Some("A sample"));
        assert!(!task.completed);
    }

    #[test]
    fn test_task_tolerates_missing_description() {
        let json = r#"{
            "id": 1,
            "user_id": "u",
            "title": "t",
            "completed": true,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).expect("task json");
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_task_update_omits_unset_fields() {
        let update = TaskUpdate {
            title: Some("new title".to_string()),
            description: None,
        };
        let json = serde_json::to_string(&update).expect("update json");
        assert_eq!(json, r#"{"title":"new title"}"#);
    }

    #[test]
    fn test_query_wire_values() {
        assert_eq!(StatusFilter::All.as_str(), "all");
        assert_eq!(StatusFilter::Pending.as_str(), "pending");
        assert_eq!(StatusFilter::Completed.as_str(), "completed");
        assert_eq!(SortKey::Created.as_str(), "created");
        assert_eq!(SortKey::Title.as_str(), "title");
    }

    #[test]
    fn test_error_body_decodes_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Task not found"}"#).expect("error body");
        assert_eq!(body.detail, "Task not found");
    }
}
