//! Layer color swatches.

use egui::{vec2, Color32, CornerRadius, CursorIcon, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};

use crate::{sizing, theme};

/// Fallback for colors that can't be parsed.
pub const UNKNOWN_COLOR: Color32 = Color32::from_rgb(128, 128, 128);

/// Style for color swatches.
#[derive(Clone)]
pub struct ColorSwatchStyle {
    /// Size of the swatch
    pub size: Vec2,
    /// Whether to show as circle (true) or rounded rect (false)
    pub circular: bool,
}

impl Default for ColorSwatchStyle {
    fn default() -> Self {
        Self {
            size: vec2(sizing::SMALL, sizing::SMALL),
            circular: true,
        }
    }
}

impl ColorSwatchStyle {
    /// Compact swatch for list rows.
    pub fn row() -> Self {
        Self {
            size: vec2(14.0, 14.0),
            circular: true,
        }
    }
}

/// A clickable color swatch.
///
/// Hidden layers are drawn as a hollow ring in their color.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    filled: bool,
    style: ColorSwatchStyle,
}

impl<'a> ColorSwatch<'a> {
    /// Create a new color swatch.
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            filled: true,
            style: ColorSwatchStyle::default(),
        }
    }

    /// Draw filled (true) or as an outline (false).
    pub fn filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Set the style.
    pub fn style(mut self, style: ColorSwatchStyle) -> Self {
        self.style = style;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            let painter = ui.painter();

            match (self.style.circular, self.filled) {
                (true, true) => {
                    painter.circle_filled(center, radius, self.color);
                }
                (true, false) => {
                    painter.circle_stroke(center, radius - 1.0, Stroke::new(2.0, self.color));
                }
                (false, filled) => {
                    let radius = CornerRadius::same(sizing::CORNER_RADIUS);
                    if filled {
                        painter.rect_filled(rect, radius, self.color);
                    } else {
                        painter.rect_stroke(
                            rect,
                            radius,
                            Stroke::new(2.0, self.color),
                            StrokeKind::Inside,
                        );
                    }
                }
            }

            if response.hovered() {
                painter.circle_stroke(center, radius + 1.0, Stroke::new(1.0, theme::BORDER));
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Parse a CSS hex color ("#rgb", "#rrggbb" or "#rrggbbaa").
///
/// Anything else maps to [`UNKNOWN_COLOR`].
pub fn parse_css_color(color: &str) -> Color32 {
    let Some(hex) = color.trim().strip_prefix('#') else {
        return UNKNOWN_COLOR;
    };
    if !hex.is_ascii() {
        return UNKNOWN_COLOR;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let short = |i: usize| channel(i..i + 1).map(|v| v * 17);

    let rgba = match hex.len() {
        3 => short(0)
            .zip(short(1))
            .zip(short(2))
            .map(|((r, g), b)| (r, g, b, 255)),
        6 | 8 => {
            let a = if hex.len() == 8 { channel(6..8) } else { Some(255) };
            channel(0..2)
                .zip(channel(2..4))
                .zip(channel(4..6))
                .zip(a)
                .map(|(((r, g), b), a)| (r, g, b, a))
        }
        _ => None,
    };

    match rgba {
        Some((r, g, b, a)) => Color32::from_rgba_unmultiplied(r, g, b, a),
        None => UNKNOWN_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(parse_css_color("#6366f1"), Color32::from_rgb(0x63, 0x66, 0xf1));
        assert_eq!(parse_css_color(" #FF0000 "), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(parse_css_color("#fff"), Color32::WHITE);
        assert_eq!(parse_css_color("#a0c"), Color32::from_rgb(0xaa, 0x00, 0xcc));
    }

    #[test]
    fn test_parse_alpha() {
        assert_eq!(
            parse_css_color("#00000000"),
            Color32::from_rgba_unmultiplied(0, 0, 0, 0)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_css_color("red"), UNKNOWN_COLOR);
        assert_eq!(parse_css_color("#12345"), UNKNOWN_COLOR);
        assert_eq!(parse_css_color("#zzzzzz"), UNKNOWN_COLOR);
        assert_eq!(parse_css_color("#ééé"), UNKNOWN_COLOR);
    }
}
