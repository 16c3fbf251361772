//! Modal dialogs.

mod confirm_delete;

pub use confirm_delete::{ConfirmDeleteModal, ConfirmDeleteResult};
