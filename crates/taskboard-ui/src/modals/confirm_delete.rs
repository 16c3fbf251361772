//! Delete confirmation modal.

use egui::{Color32, RichText};

/// Modal state for confirming a task deletion.
pub struct ConfirmDeleteModal {
    open: bool,
    task_id: i64,
    task_title: String,
}

/// Result from the confirmation modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmDeleteResult {
    None,
    Confirmed(i64),
    Cancelled,
}

impl Default for ConfirmDeleteModal {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmDeleteModal {
    pub fn new() -> Self {
        Self {
            open: false,
            task_id: 0,
            task_title: String::new(),
        }
    }

    pub fn open(&mut self, task_id: i64, task_title: String) {
        self.open = true;
        self.task_id = task_id;
        self.task_title = task_title;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.task_title.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> ConfirmDeleteResult {
        if !self.open {
            return ConfirmDeleteResult::None;
        }

        let mut result = ConfirmDeleteResult::None;

        egui::Window::new("Delete Task")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to delete this task?");
                ui.label(
                    RichText::new(format!("\"{}\"", self.task_title))
                        .italics()
                        .color(Color32::GRAY),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                        .fill(Color32::from_rgb(185, 28, 28));
                    if ui.add(delete).clicked() {
                        result = ConfirmDeleteResult::Confirmed(self.task_id);
                    }
                    if ui.button("Cancel").clicked()
                        || ui.input(|i| i.key_pressed(egui::Key::Escape))
                    {
                        result = ConfirmDeleteResult::Cancelled;
                    }
                });
            });

        if result != ConfirmDeleteResult::None {
            self.close();
        }
        result
    }
}
