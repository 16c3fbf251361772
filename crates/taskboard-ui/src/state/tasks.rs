//! Task list view-model.
//!
//! Owns the in-memory task list for the current filter/sort selection.
//! All transitions here are pure state changes; the app layer issues the
//! REST calls and feeds outcomes back in. The synchronization contract:
//!
//! - a server response is authoritative and lands as `Synced`;
//! - a definite failure (the server answered with an error) never mutates
//!   the list, it only raises a notice;
//! - an unknown outcome (transport failure) applies the mutation locally,
//!   marks the row `Local`, and raises the offline notice. The next
//!   successful refetch replaces everything with server truth.

use chrono::Utc;
use taskboard_types::{SortKey, StatusFilter, Task, TaskCreate, TaskUpdate};

/// Whether a row reflects confirmed server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Row matches a server response.
    Synced,
    /// Row was mutated locally while the server was unreachable.
    Local,
}

/// A task plus its synchronization status.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task: Task,
    pub sync: SyncState,
}

/// Non-fatal notice shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A request failed outright; the list was not changed.
    Error(String),
    /// The server is unreachable; rows marked local are not confirmed.
    Offline,
}

#[derive(Default)]
pub struct TaskListState {
    records: Vec<TaskRecord>,
    pub filter: StatusFilter,
    pub sort: SortKey,
    /// True while a list fetch is in flight.
    pub loading: bool,
    notice: Option<Notice>,
    /// Countdown for placeholder ids handed to rows created offline.
    /// Negative so they can never collide with server-assigned ids.
    next_local_id: i64,
}

impl TaskListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&TaskRecord> {
        self.records.iter().find(|r| r.task.id == id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.notice = Some(Notice::Error(message));
    }

    // =========================================================================
    // SERVER-CONFIRMED TRANSITIONS
    // =========================================================================

    /// Replace the list with a server response. Local rows are dropped;
    /// the server is the source of truth.
    pub fn set_from_server(&mut self, tasks: Vec<Task>) {
        self.records = tasks
            .into_iter()
            .map(|task| TaskRecord {
                task,
                sync: SyncState::Synced,
            })
            .collect();
        self.loading = false;
        self.notice = None;
    }

    /// A list fetch failed; keep the stale list and report why.
    pub fn refresh_failed(&mut self, unknown_outcome: bool, message: String) {
        self.loading = false;
        self.notice = Some(if unknown_outcome {
            Notice::Offline
        } else {
            Notice::Error(message)
        });
    }

    pub fn apply_created(&mut self, task: Task) {
        self.records.push(TaskRecord {
            task,
            sync: SyncState::Synced,
        });
    }

    pub fn apply_updated(&mut self, task: Task) {
        if let Some(record) = self.records.iter_mut().find(|r| r.task.id == task.id) {
            record.task = task;
            record.sync = SyncState::Synced;
        }
    }

    pub fn apply_removed(&mut self, id: i64) {
        self.records.retain(|r| r.task.id != id);
    }

    // =========================================================================
    // OPTIMISTIC TRANSITIONS (unknown outcome only)
    // =========================================================================

    /// Create a placeholder row for a create whose outcome is unknown.
    /// Returns the placeholder id.
    pub fn apply_created_local(&mut self, create: TaskCreate, user_id: &str) -> i64 {
        self.next_local_id -= 1;
        let id = self.next_local_id;
        let now = Utc::now();
        self.records.push(TaskRecord {
            task: Task {
                id,
                user_id: user_id.to_string(),
                title: create.title,
                description: create.description.filter(|d| !d.is_empty()),
                completed: false,
                created_at: now,
                updated_at: now,
            },
            sync: SyncState::Local,
        });
        self.notice = Some(Notice::Offline);
        id
    }

    pub fn apply_updated_local(&mut self, id: i64, update: &TaskUpdate) {
        if let Some(record) = self.records.iter_mut().find(|r| r.task.id == id) {
            if let Some(title) = &update.title {
                record.task.title = title.clone();
            }
            if let Some(description) = &update.description {
                record.task.description = if description.is_empty() {
                    None
                } else {
                    Some(description.clone())
                };
            }
            record.task.updated_at = Utc::now();
            record.sync = SyncState::Local;
        }
        self.notice = Some(Notice::Offline);
    }

    pub fn apply_toggled_local(&mut self, id: i64) {
        if let Some(record) = self.records.iter_mut().find(|r| r.task.id == id) {
            record.task.completed = !record.task.completed;
            record.task.updated_at = Utc::now();
            record.sync = SyncState::Local;
        }
        self.notice = Some(Notice::Offline);
    }

    pub fn apply_removed_local(&mut self, id: i64) {
        self.apply_removed(id);
        self.notice = Some(Notice::Offline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task(id: i64, title: &str, completed: bool) -> Task {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Task {
            id,
            user_id: "user-1".to_string(),
            title: title.to_string(),
            description: None,
            completed,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_set_from_server_replaces_local_rows() {
        let mut state = TaskListState::new();
        state.apply_created_local(
            TaskCreate {
                title: "offline row".to_string(),
                description: None,
            },
            "user-1",
        );
        assert_eq!(state.records().len(), 1);

        state.set_from_server(vec![sample_task(1, "server row", false)]);
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.records()[0].task.title, "server row");
        assert_eq!(state.records()[0].sync, SyncState::Synced);
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_refresh_failure_keeps_stale_list() {
        let mut state = TaskListState::new();
        state.set_from_server(vec![sample_task(1, "a", false)]);
        state.loading = true;

        state.refresh_failed(false, "HTTP 500: boom".to_string());
        assert_eq!(state.records().len(), 1);
        assert!(!state.loading);
        assert_eq!(
            state.notice(),
            Some(&Notice::Error("HTTP 500: boom".to_string()))
        );

        state.refresh_failed(true, "connection refused".to_string());
        assert_eq!(state.notice(), Some(&Notice::Offline));
    }

    #[test]
    fn test_local_create_uses_negative_placeholder_ids() {
        let mut state = TaskListState::new();
        let first = state.apply_created_local(
            TaskCreate {
                title: "one".to_string(),
                description: Some(String::new()),
            },
            "user-1",
        );
        let second = state.apply_created_local(
            TaskCreate {
                title: "two".to_string(),
                description: Some("details".to_string()),
            },
            "user-1",
        );

        assert_eq!(first, -1);
        assert_eq!(second, -2);
        let record = state.get(first).expect("record");
        assert_eq!(record.sync, SyncState::Local);
        assert_eq!(record.task.description, None);
        assert_eq!(
            state.get(second).expect("record").task.description.as_deref(),
            Some("details")
        );
        assert_eq!(state.notice(), Some(&Notice::Offline));
    }

    #[test]
    fn test_apply_updated_replaces_row_as_synced() {
        let mut state = TaskListState::new();
        state.set_from_server(vec![sample_task(1, "old", false)]);
        state.apply_updated_local(
            1,
            &TaskUpdate {
                title: Some("draft".to_string()),
                description: None,
            },
        );
        assert_eq!(state.get(1).expect("record").sync, SyncState::Local);

        let mut confirmed = sample_task(1, "confirmed", false);
        confirmed.description = Some("from server".to_string());
        state.apply_updated(confirmed);

        let record = state.get(1).expect("record");
        assert_eq!(record.task.title, "confirmed");
        assert_eq!(record.sync, SyncState::Synced);
    }

    #[test]
    fn test_local_update_clears_empty_description() {
        let mut state = TaskListState::new();
        let mut task = sample_task(1, "a", false);
        task.description = Some("old".to_string());
        state.set_from_server(vec![task]);

        state.apply_updated_local(
            1,
            &TaskUpdate {
                title: None,
                description: Some(String::new()),
            },
        );
        assert_eq!(state.get(1).expect("record").task.description, None);
    }

    #[test]
    fn test_local_toggle_flips_completion() {
        let mut state = TaskListState::new();
        state.set_from_server(vec![sample_task(1, "a", false)]);

        state.apply_toggled_local(1);
        let record = state.get(1).expect("record");
        assert!(record.task.completed);
        assert_eq!(record.sync, SyncState::Local);
    }

    #[test]
    fn test_toggled_row_stays_visible_until_refetch() {
        // The filter is applied server-side; a row toggled out of the current
        // filter remains in the list until the next fetch.
        let mut state = TaskListState::new();
        state.filter = StatusFilter::Pending;
        state.set_from_server(vec![sample_task(1, "a", false)]);

        let mut toggled = sample_task(1, "a", true);
        toggled.updated_at = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        state.apply_updated(toggled);
        assert_eq!(state.records().len(), 1);
        assert!(state.records()[0].task.completed);
    }

    #[test]
    fn test_remove_variants() {
        let mut state = TaskListState::new();
        state.set_from_server(vec![sample_task(1, "a", false), sample_task(2, "b", false)]);

        state.apply_removed(1);
        assert!(state.get(1).is_none());
        assert!(state.notice().is_none());

        state.apply_removed_local(2);
        assert!(state.is_empty());
        assert_eq!(state.notice(), Some(&Notice::Offline));
    }
}
