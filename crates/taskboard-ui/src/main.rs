//! Native entry point for development.
//!
//! Usage: TASKBOARD_API_URL=http://localhost:8000 cargo run -p taskboard-ui

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    use eframe::egui;

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Taskboard")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Taskboard",
        native_options,
        Box::new(|cc| Ok(Box::new(taskboard_ui::TaskBoardApp::new(cc)))),
    )
}

// The wasm build goes through the library's `start` entry point instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
