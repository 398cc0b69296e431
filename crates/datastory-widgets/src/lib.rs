//! egui views for the data story widgets.
//!
//! - **Layer toggle**: checkbox rows with layer color swatches
//! - **Slideshow**: step-indexed dialog with back/next navigation
//! - **Colors**: swatches and CSS color parsing

pub mod buttons;
pub mod colors;
pub mod layer_toggle;
pub mod slideshow;

pub use buttons::NavButton;
pub use colors::{parse_css_color, ColorSwatch, ColorSwatchStyle, UNKNOWN_COLOR};
pub use layer_toggle::LayerToggleView;
pub use slideshow::SlideshowDialog;

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small size (color swatches)
    pub const SMALL: f32 = 20.0;
    /// Medium size (dialog buttons)
    pub const MEDIUM: f32 = 28.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Dialog corner radius
    pub const PANEL_RADIUS: u8 = 12;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Accent color, light blue like the story theme
    pub const ACCENT: Color32 = Color32::from_rgb(2, 119, 189);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
}
