//! egui-based user interface
//!
//! The UI is a single window with a scrolling message list, a text/voice
//! input bar, and an optional debug side panel. All state mutation happens
//! on the UI thread; background work reports in through channels that
//! [`AppState::poll_events`] drains once per frame.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::BanterApp;
pub use state::AppState;
pub use theme::Theme;

/// Run the Banter UI until the window is closed.
pub fn run(state: AppState) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Banter"),
        ..Default::default()
    };

    eframe::run_native(
        "Banter",
        options,
        Box::new(|cc| Ok(Box::new(BanterApp::new(cc, state)))),
    )
}
