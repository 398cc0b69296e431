//! Checkbox list for a [`LayerToggle`].

use datastory_core::LayerToggle;
use egui::{RichText, Ui};

use crate::colors::{parse_css_color, ColorSwatch, ColorSwatchStyle};
use crate::theme;

/// Renders one row per watched layer: color swatch plus checkbox.
///
/// Clicking either the swatch or the checkbox flips the layer and writes
/// the new selection back through [`LayerToggle::set_selected`].
pub struct LayerToggleView<'a> {
    title: Option<&'a str>,
}

impl Default for LayerToggleView<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LayerToggleView<'a> {
    pub fn new() -> Self {
        Self { title: None }
    }

    /// Show a section label above the rows.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Show the rows. Returns true if the selection was changed.
    pub fn show(self, ui: &mut Ui, toggle: &LayerToggle) -> bool {
        let projection = toggle.projection();
        let mut flipped = None;

        ui.vertical(|ui| {
            if let Some(title) = self.title {
                ui.label(RichText::new(title).size(12.0).strong().color(theme::TEXT));
                ui.add_space(4.0);
            }
            if projection.layers.is_empty() {
                ui.label(RichText::new("No layers").color(theme::TEXT_MUTED));
                return;
            }
            for (index, entry) in projection.layers.iter().enumerate() {
                let mut checked = projection.is_selected(index);
                ui.horizontal(|ui| {
                    let (swatch_clicked, _) =
                        ColorSwatch::new(parse_css_color(&entry.color), &entry.label)
                            .filled(checked)
                            .style(ColorSwatchStyle::row())
                            .show(ui);
                    let box_changed = ui.checkbox(&mut checked, entry.label.as_str()).changed();
                    if swatch_clicked || box_changed {
                        flipped = Some(index);
                    }
                });
            }
        });

        let Some(index) = flipped else {
            return false;
        };
        let selected = flip_selection(projection.selected, index);
        match toggle.set_selected(&selected) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Layer toggle update failed: {}", e);
                false
            }
        }
    }
}

/// Toggle `index` in a sorted selection, keeping it sorted.
fn flip_selection(mut selected: Vec<usize>, index: usize) -> Vec<usize> {
    match selected.binary_search(&index) {
        Ok(pos) => {
            selected.remove(pos);
        }
        Err(pos) => selected.insert(pos, index),
    }
    selected
}
