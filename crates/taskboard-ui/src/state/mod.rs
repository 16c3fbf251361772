//! Application state: the session store and the task list view-model.

mod session;
mod tasks;

pub use session::{AuthStatus, Session, SessionStore, User};
pub use tasks::{Notice, SyncState, TaskListState, TaskRecord};
