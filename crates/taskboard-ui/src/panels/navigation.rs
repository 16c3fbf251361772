//! Navigation bar: app title, signed-in user, logout.

use egui::{Color32, RichText, Ui};

/// Result from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    None,
    Logout,
}

pub fn navigation_bar(ui: &mut Ui, user_email: &str) -> NavAction {
    let mut action = NavAction::None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("Taskboard").strong().size(16.0));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Logout").clicked() {
                action = NavAction::Logout;
            }
            ui.label(
                RichText::new(user_email)
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
    });

    action
}
