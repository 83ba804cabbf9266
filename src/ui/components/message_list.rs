//! Message list component
//!
//! Displays the conversation, including the assistant message still
//! streaming in.

use crate::messages::{Message, Sender};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

/// Message list component
pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages = self.state.controller.log().get_all();
        let streaming = self.state.controller.streaming_message();

        if messages.is_empty() {
            self.show_empty_state(ui);
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);
                for message in &messages {
                    self.show_message(ui, message, streaming == Some(message.id));
                    ui.add_space(self.theme.spacing_sm);
                }
                ui.add_space(self.theme.spacing);
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);

            ui.label(
                RichText::new("Banter")
                    .size(28.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("Type below, or hold a conversation hands-free.")
                    .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing_lg);
            ui.horizontal_wrapped(|ui| {
                // Keep the two cards centered as a pair
                let card_width = 170.0;
                let indent = (ui.available_width() - card_width * 2.0 - self.theme.spacing) / 2.0;
                ui.add_space(indent.max(0.0));
                self.hint_card(ui, card_width, "⌨", "Press Enter to send a message");
                ui.add_space(self.theme.spacing);
                self.hint_card(ui, card_width, "🎤", "Click the mic and just talk");
            });
        });
    }

    fn hint_card(&self, ui: &mut egui::Ui, width: f32, icon: &str, text: &str) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm * 1.5)
            .show(ui, |ui| {
                ui.set_width(width);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(icon).size(18.0));
                    ui.label(RichText::new(text).size(12.0).color(self.theme.text_muted));
                });
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message, is_streaming: bool) {
        let is_user = message.sender == Sender::User;
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            // Sender and time on one line above the bubble
            let header = format!(
                "{} · {}",
                if is_user { "You" } else { "Banter" },
                message.timestamp.format("%H:%M")
            );
            ui.label(RichText::new(header).size(11.0).color(self.theme.text_muted));

            let fill = if is_user {
                self.theme.user_bubble
            } else {
                self.theme.assistant_bubble
            };

            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(ui.available_width() * 0.75);
                    self.show_body(ui, message, is_streaming, is_user);
                });
        });
    }

    fn show_body(&self, ui: &mut egui::Ui, message: &Message, is_streaming: bool, is_user: bool) {
        let color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };

        if message.text.is_empty() && is_streaming {
            // Waiting for the first fragment
            let t = ui.ctx().input(|i| i.time);
            let dots = ".".repeat((t * 2.5) as usize % 3 + 1);
            ui.label(RichText::new(dots).color(self.theme.text_muted));
            return;
        }

        let mut body = message.text.clone();
        if is_streaming && (ui.ctx().input(|i| i.time) * 2.0) as i64 % 2 == 0 {
            body.push('▌');
        }
        ui.label(RichText::new(body).color(color));
    }
}
