//! Task list panel.
//!
//! Renders the task rows for the current filter/sort selection. Each row has
//! a completion checkbox, Edit and Delete controls; Edit swaps the row for an
//! inline editor. The panel owns only the transient edit buffer; list data
//! stays in the view-model and mutations are dispatched upward as actions.

use egui::{Color32, RichText, ScrollArea, TextEdit, Ui};
use taskboard_types::{TaskUpdate, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

use crate::state::{SyncState, TaskRecord};

/// Inline editor buffer for one row.
struct EditState {
    id: i64,
    title: String,
    description: String,
    error: Option<String>,
}

/// Task list widget.
pub struct TaskListPanel {
    edit: Option<EditState>,
}

/// User intent dispatched from the list.
#[derive(Debug, Clone)]
pub enum TaskListAction {
    None,
    ToggleCompletion(i64),
    SubmitEdit { id: i64, update: TaskUpdate },
    RequestDelete { id: i64, title: String },
}

impl Default for TaskListPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskListPanel {
    pub fn new() -> Self {
        Self { edit: None }
    }

    /// Open the inline editor for a row, seeded with its current fields.
    pub fn open_edit(&mut self, record: &TaskRecord) {
        self.edit = Some(EditState {
            id: record.task.id,
            title: record.task.title.clone(),
            description: record.task.description.clone().unwrap_or_default(),
            error: None,
        });
    }

    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    /// Surface a server-side rejection inside the open editor.
    pub fn set_edit_error(&mut self, message: String) {
        if let Some(edit) = &mut self.edit {
            edit.error = Some(message);
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut Ui,
        records: &[TaskRecord],
        loading: bool,
        busy: bool,
    ) -> TaskListAction {
        let mut action = TaskListAction::None;

        if loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading tasks...");
            });
            return action;
        }

        if records.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No tasks found").color(Color32::GRAY));
            });
            return action;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for record in records {
                    let editing_this = self
                        .edit
                        .as_ref()
                        .map(|e| e.id == record.task.id)
                        .unwrap_or(false);

                    if editing_this {
                        if let Some(row_action) = self.render_editor(ui, busy) {
                            action = row_action;
                        }
                    } else if let Some(row_action) = render_row(ui, record, busy) {
                        match row_action {
                            RowAction::StartEdit => self.open_edit(record),
                            RowAction::Toggle => {
                                action = TaskListAction::ToggleCompletion(record.task.id)
                            }
                            RowAction::Delete => {
                                action = TaskListAction::RequestDelete {
                                    id: record.task.id,
                                    title: record.task.title.clone(),
                                }
                            }
                        }
                    }
                    ui.separator();
                }
            });

        action
    }

    fn render_editor(&mut self, ui: &mut Ui, busy: bool) -> Option<TaskListAction> {
        let edit = self.edit.as_mut()?;
        let mut result = None;
        let mut close = false;

        egui::Frame::none()
            .fill(Color32::from_rgb(45, 42, 25))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if let Some(error) = &edit.error {
                    ui.colored_label(Color32::from_rgb(248, 113, 113), error);
                    ui.add_space(4.0);
                }

                ui.add(
                    TextEdit::singleline(&mut edit.title)
                        .char_limit(TITLE_MAX_CHARS)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(4.0);
                ui.add(
                    TextEdit::multiline(&mut edit.description)
                        .char_limit(DESCRIPTION_MAX_CHARS)
                        .desired_rows(2)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Save")).clicked() {
                        let update = TaskUpdate {
                            title: Some(edit.title.trim().to_string()),
                            description: Some(edit.description.clone()),
                        };
                        match update.validate() {
                            Ok(()) => {
                                edit.error = None;
                                result = Some(TaskListAction::SubmitEdit {
                                    id: edit.id,
                                    update,
                                });
                            }
                            Err(e) => edit.error = Some(e.to_string()),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if close {
            self.edit = None;
        }
        result
    }
}

/// Intra-row intent before it is resolved against the record.
enum RowAction {
    Toggle,
    StartEdit,
    Delete,
}

fn render_row(ui: &mut Ui, record: &TaskRecord, busy: bool) -> Option<RowAction> {
    let task = &record.task;
    let mut action = None;

    ui.horizontal(|ui| {
        let mut completed = task.completed;
        if ui
            .add_enabled(!busy, egui::Checkbox::without_text(&mut completed))
            .changed()
        {
            action = Some(RowAction::Toggle);
        }

        ui.vertical(|ui| {
            let title = if task.completed {
                RichText::new(&task.title).strikethrough().color(Color32::GRAY)
            } else {
                RichText::new(&task.title).strong()
            };
            ui.horizontal(|ui| {
                ui.label(title);
                if record.sync == SyncState::Local {
                    ui.label(
                        RichText::new("not synced")
                            .size(10.0)
                            .color(Color32::from_rgb(251, 191, 36)),
                    )
                    .on_hover_text("Applied locally; the server has not confirmed this change.");
                }
            });

            if let Some(description) = &task.description {
                ui.label(RichText::new(description).size(11.0).color(Color32::GRAY));
            }
            ui.label(
                RichText::new(format!(
                    "Created: {} | Updated: {}",
                    task.created_at.format("%b %e, %Y %H:%M"),
                    task.updated_at.format("%b %e, %Y %H:%M"),
                ))
                .size(10.0)
                .color(Color32::DARK_GRAY),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add_enabled(!busy, egui::Button::new("Delete")).clicked() {
                action = Some(RowAction::Delete);
            }
            if ui.add_enabled(!busy, egui::Button::new("Edit")).clicked() {
                action = Some(RowAction::StartEdit);
            }
        });
    });

    action
}
