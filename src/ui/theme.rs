//! Theme and styling for the Banter UI
//!
//! One dark palette, applied to egui at startup.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    // Accents
    pub primary: Color32,
    pub error: Color32,
    pub recording: Color32,

    // Surfaces, darkest to lightest
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    // Text
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Waveform trace
    pub waveform_active: Color32,
    pub waveform_inactive: Color32,

    // Message bubbles
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,

    // Corner radii
    pub button_rounding: Rounding,
    pub bubble_rounding: Rounding,
    pub card_rounding: Rounding,

    // Spacing scale
    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(45, 212, 191),
            error: Color32::from_rgb(248, 113, 113),
            recording: Color32::from_rgb(248, 113, 113),

            bg_primary: Color32::from_rgb(24, 24, 27),
            bg_secondary: Color32::from_rgb(39, 39, 42),
            bg_tertiary: Color32::from_rgb(63, 63, 70),

            text_primary: Color32::from_rgb(244, 244, 245),
            text_secondary: Color32::from_rgb(212, 212, 216),
            text_muted: Color32::from_rgb(161, 161, 170),

            waveform_active: Color32::from_rgb(45, 212, 191),
            waveform_inactive: Color32::from_rgb(82, 82, 91),

            user_bubble: Color32::from_rgb(15, 118, 110),
            assistant_bubble: Color32::from_rgb(39, 39, 42),

            button_rounding: Rounding::same(8.0),
            bubble_rounding: Rounding::same(12.0),
            card_rounding: Rounding::same(10.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_primary;
        visuals.hyperlink_color = self.primary;
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        let widgets = &mut visuals.widgets;
        widgets.noninteractive.bg_fill = self.bg_secondary;
        widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        widgets.inactive.bg_fill = self.bg_tertiary;
        widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        widgets.hovered.bg_fill = self.bg_tertiary.gamma_multiply(1.3);
        widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);
        widgets.active.bg_fill = self.primary.gamma_multiply(0.6);
        widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);
        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing_sm * 1.5, self.spacing_sm);

        let text_sizes = [
            (TextStyle::Heading, 22.0, FontFamily::Proportional),
            (TextStyle::Body, 14.0, FontFamily::Proportional),
            (TextStyle::Button, 14.0, FontFamily::Proportional),
            (TextStyle::Monospace, 13.0, FontFamily::Monospace),
            (TextStyle::Small, 11.0, FontFamily::Proportional),
        ];
        for (text_style, size, family) in text_sizes {
            style.text_styles.insert(text_style, FontId::new(size, family));
        }
        ctx.set_style(style);
    }
}
