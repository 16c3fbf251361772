//! Login Panel
//!
//! Email/password form feeding the mock sign-in. There is no credential
//! check behind this; any well-formed input is accepted.

use egui::{Color32, RichText, TextEdit, Ui};

/// Login form state.
pub struct LoginPanel {
    email: String,
    password: String,
    error: Option<String>,
    /// Informational banner, e.g. after a session expires.
    notice: Option<String>,
}

/// Result from the login panel.
#[derive(Debug, Clone)]
pub enum LoginAction {
    None,
    SignIn { email: String, password: String },
}

impl Default for LoginPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPanel {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            error: None,
            notice: None,
        }
    }

    /// Show an informational banner above the form.
    pub fn set_notice(&mut self, notice: &str) {
        self.notice = Some(notice.to_string());
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
        self.error = None;
        self.notice = None;
    }

    pub fn ui(&mut self, ui: &mut Ui) -> LoginAction {
        let mut action = LoginAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.heading("Taskboard");
            ui.label(
                RichText::new("Sign in to manage your tasks")
                    .color(Color32::GRAY)
                    .size(12.0),
            );
            ui.add_space(16.0);

            if let Some(notice) = &self.notice {
                ui.label(RichText::new(notice).color(Color32::from_rgb(251, 191, 36)));
                ui.add_space(8.0);
            }
            if let Some(error) = &self.error {
                ui.colored_label(Color32::from_rgb(248, 113, 113), error);
                ui.add_space(8.0);
            }

            let width = 280.0_f32.min(ui.available_width());
            ui.add(
                TextEdit::singleline(&mut self.email)
                    .hint_text("Email")
                    .desired_width(width),
            );
            ui.add_space(4.0);
            let password_response = ui.add(
                TextEdit::singleline(&mut self.password)
                    .hint_text("Password")
                    .password(true)
                    .desired_width(width),
            );
            ui.add_space(12.0);

            let submit_shortcut = password_response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Sign In").clicked() || submit_shortcut {
                match self.validate() {
                    Ok(()) => {
                        self.error = None;
                        self.notice = None;
                        action = LoginAction::SignIn {
                            email: self.email.trim().to_string(),
                            password: std::mem::take(&mut self.password),
                        };
                    }
                    Err(message) => self.error = Some(message),
                }
            }
        });

        action
    }

    fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !email.contains('@') {
            return Err("Enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_email_and_password() {
        let mut panel = LoginPanel::new();
        assert!(panel.validate().is_err());

        panel.email = "ada@example.com".to_string();
        assert!(panel.validate().is_err());

        panel.password = "secret".to_string();
        assert!(panel.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let mut panel = LoginPanel::new();
        panel.email = "not-an-email".to_string();
        panel.password = "secret".to_string();
        assert_eq!(
            panel.validate(),
            Err("Enter a valid email address".to_string())
        );
    }
}
