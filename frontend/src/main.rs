//! Keycap Configurator entry point

use std::sync::OnceLock;
use zoon::*;

/// Keeps the startup task alive for the lifetime of the page.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod config;
mod connection;
mod dataflow;
mod error_display;
mod layer_panel;
mod svg_preview;
mod views;

pub fn main() {
    let handle = Task::start_droppable(async {
        let app = crate::app::KeycapApp::new();
        let root_element = app.root();
        start_app("app", move || root_element);
    });
    let _ = MAIN_TASK.set(handle);
}
