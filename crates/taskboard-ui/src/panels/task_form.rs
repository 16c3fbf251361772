//! Task creation form.
//!
//! Validates title/description limits client-side before emitting a create
//! request; violations render inline and nothing is sent.

use egui::{Color32, RichText, TextEdit, Ui};
use taskboard_types::{TaskCreate, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

/// Creation form state.
pub struct TaskForm {
    title: String,
    description: String,
    error: Option<String>,
}

/// Result from the creation form.
#[derive(Debug, Clone)]
pub enum TaskFormAction {
    None,
    Create(TaskCreate),
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            error: None,
        }
    }

    /// Reset the form after a successful (or locally-applied) create.
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.error = None;
    }

    /// Surface a server-side rejection next to the form.
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn ui(&mut self, ui: &mut Ui, busy: bool) -> TaskFormAction {
        let mut action = TaskFormAction::None;

        ui.vertical(|ui| {
            if let Some(error) = &self.error {
                ui.colored_label(Color32::from_rgb(248, 113, 113), error);
                ui.add_space(4.0);
            }

            ui.label(RichText::new("Title *").size(11.0).color(Color32::GRAY));
            ui.add(
                TextEdit::singleline(&mut self.title)
                    .hint_text("Task title (1-200 characters)")
                    .char_limit(TITLE_MAX_CHARS)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(4.0);

            ui.label(
                RichText::new("Description")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            ui.add(
                TextEdit::multiline(&mut self.description)
                    .hint_text("Task description (optional, max 1000 characters)")
                    .char_limit(DESCRIPTION_MAX_CHARS)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);

            let label = if busy { "Creating..." } else { "Create Task" };
            if ui
                .add_enabled(!busy, egui::Button::new(label))
                .clicked()
            {
                match self.build_create() {
                    Ok(create) => {
                        self.error = None;
                        action = TaskFormAction::Create(create);
                    }
                    Err(message) => self.error = Some(message),
                }
            }
        });

        action
    }

    fn build_create(&self) -> Result<TaskCreate, String> {
        let create = TaskCreate {
            title: self.title.trim().to_string(),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        };
        create.validate().map_err(|e| e.to_string())?;
        Ok(create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_create_requires_title() {
        let mut form = TaskForm::new();
        assert_eq!(form.build_create(), Err("Title is required".to_string()));

        form.title = "  ".to_string();
        assert_eq!(form.build_create(), Err("Title is required".to_string()));
    }

    #[test]
    fn test_build_create_trims_title_and_drops_empty_description() {
        let mut form = TaskForm::new();
        form.title = "  buy milk  ".to_string();
        let create = form.build_create().expect("create");
        assert_eq!(create.title, "buy milk");
        assert_eq!(create.description, None);
    }

    #[test]
    fn test_build_create_keeps_description() {
        let mut form = TaskForm::new();
        form.title = "buy milk".to_string();
        form.description = "two liters".to_string();
        let create = form.build_create().expect("create");
        assert_eq!(create.description.as_deref(), Some("two liters"));
    }

    #[test]
    fn test_build_create_rejects_long_description() {
        let mut form = TaskForm::new();
        form.title = "t".to_string();
        form.description = "d".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert_eq!(
            form.build_create(),
            Err("Description must be no more than 1000 characters".to_string())
        );
    }
}
