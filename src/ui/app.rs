//! Main application struct and eframe integration
//!
//! This module contains the main BanterApp that implements eframe::App.

use crate::ui::components::{DebugPanel, InputBar, MessageList, Waveform};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use tracing::info;

/// Main Banter application
pub struct BanterApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
    /// Whether the app has been initialized
    initialized: bool,
}

impl BanterApp {
    /// Create a new Banter application
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state,
            theme,
            initialized: false,
        }
    }

    /// One-time setup on the first frame
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.state.debug_info.add_log("Banter UI initialized".to_string());
        self.initialized = true;
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .inner_margin(egui::Margin::symmetric(self.theme.spacing, 12.0));

        TopBottomPanel::top("header").frame(frame).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Banter")
                        .size(20.0)
                        .strong()
                        .color(self.theme.primary),
                );

                let subtitle = if self.state.controller.is_generating() {
                    "thinking..."
                } else {
                    "voice chat"
                };
                ui.label(RichText::new(subtitle).size(13.0).color(self.theme.text_muted));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🗑").on_hover_text("Clear conversation").clicked() {
                        self.state.clear_messages();
                    }
                    if ui.button("🔍").on_hover_text("Toggle debug panel").clicked() {
                        self.state.show_debug_panel = !self.state.show_debug_panel;
                    }
                });
            });
        });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::none()
            .fill(self.theme.bg_primary)
            .inner_margin(self.theme.spacing);

        TopBottomPanel::bottom("input_area").frame(frame).show(ctx, |ui| {
            if self.state.capture.is_listening() {
                Waveform::new(&self.state, &self.theme).height(50.0).show(ui);
                ui.add_space(self.theme.spacing_sm);
            }
            InputBar::new(&mut self.state, &self.theme).show(ui);
        });
    }

    fn show_debug_panel(&mut self, ctx: &egui::Context) {
        if !self.state.show_debug_panel {
            return;
        }

        SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(300.0)
            .width_range(250.0..=500.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                DebugPanel::new(&self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::none()
            .fill(self.theme.bg_primary)
            .inner_margin(egui::Margin::symmetric(self.theme.spacing, 0.0));

        CentralPanel::default().frame(frame).show(ctx, |ui| {
            MessageList::new(&self.state, &self.theme).show(ui);
        });
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice.clone() else {
            return;
        };

        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(RichText::new(notice).color(self.theme.text_primary));
                ui.add_space(self.theme.spacing_sm);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.state.dismiss_notice();
                    }
                });
            });
    }
}

impl eframe::App for BanterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.initialize();

        // Apply pending controller and capture events
        self.state.poll_events();

        self.show_header(ctx);
        self.show_debug_panel(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);
        self.show_notice(ctx);

        // Keep painting while text streams in or audio is live
        if self.state.controller.is_generating() || self.state.capture.is_listening() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Banter shutting down");
    }
}
