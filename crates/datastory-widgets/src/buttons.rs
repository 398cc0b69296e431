//! Dialog buttons.

use egui::{vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Sense, Ui};

use crate::{sizing, theme};

/// A text button for dialog navigation.
///
/// Primary buttons use the accent background; disabled buttons are drawn
/// muted and never report clicks.
pub struct NavButton<'a> {
    label: &'a str,
    primary: bool,
    enabled: bool,
    min_width: f32,
}

impl<'a> NavButton<'a> {
    /// Create a new button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            primary: false,
            enabled: true,
            min_width: 64.0,
        }
    }

    /// Use the accent style.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Enable or disable the button.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(13.0);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let width = (galley.size().x + 24.0).max(self.min_width);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(vec2(width, sizing::MEDIUM), sense);

        if ui.is_rect_visible(rect) {
            let (bg_color, text_color) = match (self.enabled, self.primary) {
                (false, _) => (theme::HOVER_BG, theme::TEXT_MUTED),
                (true, true) => (theme::ACCENT, Color32::WHITE),
                (true, false) if response.hovered() => (theme::HOVER_BG, theme::TEXT),
                (true, false) => (Color32::TRANSPARENT, theme::TEXT),
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = self.enabled && response.clicked();
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}
