//! Input bar component
//!
//! Provides text input, the voice toggle, and send controls.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, Rect, RichText, Vec2};

const CONTROL_SIZE: f32 = 44.0;

/// Input bar component for text and voice input
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm * 1.5)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_record_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                });
            });
    }

    fn show_record_button(&mut self, ui: &mut egui::Ui) {
        let is_listening = self.state.capture.is_listening();

        let mut button = egui::Button::new(
            RichText::new(if is_listening { "⏹" } else { "🎤" })
                .size(20.0)
                .color(if is_listening {
                    self.theme.recording
                } else {
                    self.theme.text_secondary
                }),
        )
        .min_size(Vec2::splat(CONTROL_SIZE))
        .rounding(self.theme.button_rounding);
        if is_listening {
            button = button.fill(self.theme.recording.gamma_multiply(0.2));
        }

        let response = ui.add(button);
        let clicked = response.clicked();
        let rect = response.rect;
        response.on_hover_text(if is_listening {
            "Stop listening"
        } else {
            "Start voice input"
        });

        if clicked {
            self.state.toggle_capture();
        }

        if is_listening {
            self.draw_pulse_ring(ui, rect);
            ui.label(
                RichText::new(format!("{}s", self.state.capture.elapsed_seconds()))
                    .size(12.0)
                    .family(egui::FontFamily::Monospace)
                    .color(self.theme.recording),
            );
        }
    }

    /// Animated ring around the record button while listening
    fn draw_pulse_ring(&self, ui: &egui::Ui, rect: Rect) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

        let radius = rect.width() / 2.0 + 2.0 + pulse * 3.0;
        ui.painter().circle_stroke(
            rect.center(),
            radius,
            egui::Stroke::new(
                2.0 * pulse,
                self.theme.recording.gamma_multiply(1.0 - pulse * 0.5),
            ),
        );
        ui.ctx().request_repaint();
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        // Leave room for the send button on the right
        let width = ui.available_width() - CONTROL_SIZE - self.theme.spacing;

        let response = ui.add(
            egui::TextEdit::singleline(&mut self.state.input_text)
                .hint_text("Ask anything...")
                .desired_width(width)
                .font(egui::TextStyle::Body)
                .margin(egui::Margin::symmetric(12.0, 8.0)),
        );

        // Enter makes the box surrender focus, so the press shows up as
        // lost_focus. A submit mid-response cancels the old turn.
        if response.lost_focus()
            && !self.state.input_text.trim().is_empty()
            && ui.input(|i| i.key_pressed(Key::Enter))
        {
            self.state.send_message();
        }

        if !self.state.capture.is_listening() {
            response.request_focus();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let is_generating = self.state.controller.is_generating();
        let can_send = !self.state.input_text.trim().is_empty();

        let button = egui::Button::new(
            RichText::new(if is_generating { "⏹" } else { "➤" })
                .size(18.0)
                .color(self.theme.bg_primary),
        )
        .min_size(Vec2::splat(CONTROL_SIZE))
        .rounding(self.theme.button_rounding)
        .fill(if can_send || is_generating {
            self.theme.primary
        } else {
            self.theme.text_muted
        });

        let response = ui.add_enabled(can_send || is_generating, button);
        if response.clicked() {
            if is_generating {
                self.state.stop_generation();
            } else {
                self.state.send_message();
            }
        }
        response.on_hover_text(if is_generating {
            "Stop response"
        } else {
            "Send message (Enter)"
        });
    }
}
