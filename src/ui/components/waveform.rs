//! Waveform visualization component
//!
//! Draws a live trace of recent microphone samples while listening.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Pos2, Rect, Stroke};

/// Waveform visualization component
pub struct Waveform<'a> {
    state: &'a AppState,
    theme: &'a Theme,
    height: f32,
}

impl<'a> Waveform<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            height: 60.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let size = egui::Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());

        ui.painter()
            .rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);

        let is_listening = self.state.capture.is_listening();
        let samples = self.state.tap.snapshot();
        let inner = rect.shrink(8.0);

        if samples.is_empty() {
            // Nothing captured yet, draw the resting line
            ui.painter().line_segment(
                [inner.left_center(), inner.right_center()],
                Stroke::new(1.0, self.theme.waveform_inactive),
            );
        } else {
            let color = if is_listening {
                self.theme.waveform_active
            } else {
                self.theme.waveform_inactive
            };
            self.draw_trace(ui, inner, &samples, color);
        }

        if is_listening {
            self.draw_live_dot(ui, rect);
            ui.ctx().request_repaint();
        }

        response
    }

    fn draw_trace(&self, ui: &egui::Ui, rect: Rect, samples: &[f32], color: egui::Color32) {
        // One point per horizontal pixel, striding through the buffer
        let columns = (rect.width().max(1.0) as usize).min(samples.len());
        let step = (samples.len() / columns.max(1)).max(1);
        let dx = rect.width() / columns.max(1) as f32;

        let mid = rect.center().y;
        let amp = rect.height() / 2.0;

        let points: Vec<Pos2> = samples
            .iter()
            .step_by(step)
            .take(columns)
            .enumerate()
            .map(|(i, &s)| Pos2::new(rect.left() + i as f32 * dx, mid - s.clamp(-1.0, 1.0) * amp))
            .collect();

        if points.len() >= 2 {
            ui.painter().add(egui::Shape::line(points, Stroke::new(1.5, color)));
        }
    }

    fn draw_live_dot(&self, ui: &egui::Ui, rect: Rect) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 2.0).sin() * 0.5 + 0.5) as f32;

        let center = Pos2::new(rect.left() + 16.0, rect.top() + 14.0);
        ui.painter().circle_filled(
            center,
            5.0 + pulse * 2.0,
            self.theme.recording.gamma_multiply(0.4 + pulse * 0.4),
        );
        ui.painter().circle_filled(center, 3.5, self.theme.recording);

        ui.painter().text(
            Pos2::new(center.x + 12.0, center.y),
            egui::Align2::LEFT_CENTER,
            "Listening",
            egui::FontId::proportional(11.0),
            self.theme.recording,
        );
    }
}
