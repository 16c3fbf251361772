//! Taskboard UI - browser todo-list frontend
//!
//! An egui/eframe single-page app over a remote task service. Compiles to
//! WebAssembly for the browser and to a native window for development.

pub mod api;
pub mod app;
pub mod modals;
pub mod panels;
pub mod state;

pub use app::TaskBoardApp;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast as _;

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("taskboard_canvas"))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .expect("missing canvas element #taskboard_canvas");

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(TaskBoardApp::new(cc)))),
            )
            .await
            .expect("Failed to start eframe");
    });
}
