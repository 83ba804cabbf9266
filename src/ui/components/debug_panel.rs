//! Debug panel component
//!
//! Displays internal state information for debugging.

use crate::capture::CaptureState;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

/// Debug panel component
pub struct DebugPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("Debug")
                .strong()
                .color(self.theme.text_primary),
        );
        ui.separator();

        egui::Grid::new("debug_stats")
            .num_columns(2)
            .spacing([20.0, 4.0])
            .show(ui, |ui| {
                self.stat_row(ui, "Capture", self.capture_status());
                self.stat_row(ui, "Generation", self.generation_status());
                self.stat_row(ui, "Messages", self.state.controller.log().len().to_string());
                self.stat_row(
                    ui,
                    "Context",
                    format!(
                        "{} / {} entries",
                        self.state.controller.context_len(),
                        self.state.controller.config().context_entries
                    ),
                );
                self.stat_row(ui, "Endpoint", self.state.controller.config().endpoint.clone());
                self.stat_row(ui, "Stats", self.state.debug_info.generation_stats.clone());
                self.stat_row(ui, "Transcript", self.state.debug_info.last_transcript.clone());
                self.stat_row(ui, "Tap samples", self.state.tap.len().to_string());
            });

        if let Some(error) = self.state.controller.last_error() {
            ui.add_space(self.theme.spacing_sm);
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("⚠").color(self.theme.error));
                ui.label(RichText::new(error).size(12.0).color(self.theme.error));
            });
        }

        ui.add_space(self.theme.spacing_sm);
        ui.separator();
        ui.label(
            RichText::new("Recent Logs")
                .size(12.0)
                .strong()
                .color(self.theme.text_secondary),
        );

        ScrollArea::vertical()
            .max_height(120.0)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if self.state.debug_info.log_messages.is_empty() {
                    ui.label(
                        RichText::new("No log messages")
                            .size(11.0)
                            .color(self.theme.text_muted)
                            .italics(),
                    );
                }
                for entry in &self.state.debug_info.log_messages {
                    ui.label(
                        RichText::new(entry)
                            .size(11.0)
                            .family(egui::FontFamily::Monospace)
                            .color(self.theme.text_muted),
                    );
                }
            });
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: String) {
        ui.label(RichText::new(label).size(12.0).color(self.theme.text_muted));
        ui.label(
            RichText::new(if value.is_empty() { "—".to_string() } else { value })
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_primary),
        );
        ui.end_row();
    }

    fn capture_status(&self) -> String {
        match self.state.capture.state() {
            CaptureState::Idle => "Idle".to_string(),
            CaptureState::Listening => {
                format!("Listening ({}s)", self.state.capture.elapsed_seconds())
            }
        }
    }

    fn generation_status(&self) -> String {
        match self.state.controller.streaming_message() {
            Some(id) => {
                let chars = self
                    .state
                    .controller
                    .log()
                    .text_of(id)
                    .map_or(0, |text| text.len());
                format!("Streaming ({} chars)", chars)
            }
            None => "Idle".to_string(),
        }
    }
}
