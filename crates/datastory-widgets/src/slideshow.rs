//! Slideshow dialog.

use datastory_core::{Slideshow, SlideshowNav};
use egui::{vec2, Align2, Color32, CornerRadius, Frame, Id, Margin, Sense, Stroke, Ui, Vec2};

use crate::buttons::NavButton;
use crate::{sizing, theme};

/// Draws a [`Slideshow`] as a centered modal card.
///
/// The header shows the slideshow's current title. Navigation is reported
/// back instead of applied, so story-specific slideshows can gate it (see
/// `AngsizeDistanceSlideshow::navigate`).
pub struct SlideshowDialog<'a> {
    id_source: &'a str,
    width: f32,
    next_enabled: bool,
}

impl<'a> SlideshowDialog<'a> {
    /// Create a dialog. `id_source` must be unique per slideshow.
    pub fn new(id_source: &'a str) -> Self {
        Self {
            id_source,
            width: 640.0,
            next_enabled: true,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Enable or disable the "Next" button.
    pub fn next_enabled(mut self, enabled: bool) -> Self {
        self.next_enabled = enabled;
        self
    }

    /// Show the dialog if the slideshow is open. `body` draws the content of
    /// the given step.
    pub fn show(
        self,
        ctx: &egui::Context,
        slideshow: &Slideshow,
        body: impl FnOnce(&mut Ui, usize),
    ) -> Option<SlideshowNav> {
        if !slideshow.is_open() {
            return None;
        }

        let mut nav = None;
        egui::Area::new(Id::new(self.id_source))
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .order(egui::Order::Foreground)
            .interactable(true)
            .show(ctx, |ui| {
                Frame::new()
                    .fill(Color32::WHITE)
                    .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
                    .stroke(Stroke::new(1.0, theme::BORDER))
                    .inner_margin(Margin::same(20))
                    .show(ui, |ui| {
                        ui.set_width(self.width);

                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(slideshow.current_title())
                                    .size(18.0)
                                    .strong()
                                    .color(theme::TEXT),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if NavButton::new("Close").show(ui) {
                                    nav = Some(SlideshowNav::Close);
                                }
                            });
                        });
                        divider(ui);

                        body(ui, slideshow.step());

                        divider(ui);
                        ui.horizontal(|ui| {
                            if NavButton::new("Back")
                                .enabled(slideshow.step() > 0)
                                .show(ui)
                            {
                                nav = Some(SlideshowNav::Back);
                            }
                            step_dots(ui, slideshow.step(), slideshow.length());
                            let (label, action) = if slideshow.is_last_step() {
                                ("Done", SlideshowNav::Close)
                            } else {
                                ("Next", SlideshowNav::Next)
                            };
                            if NavButton::new(label)
                                .primary()
                                .enabled(self.next_enabled)
                                .show(ui)
                            {
                                nav = Some(action);
                            }
                        });
                    });
            });

        nav
    }
}

/// Full-width rule between the dialog's header, body and footer.
fn divider(ui: &mut Ui) {
    ui.add_space(6.0);
    let rect = ui.available_rect_before_wrap();
    ui.painter()
        .hline(rect.x_range(), rect.top(), Stroke::new(1.0, theme::BORDER));
    ui.add_space(6.0);
}

/// Row of dots, the current step highlighted.
fn step_dots(ui: &mut Ui, step: usize, length: usize) {
    const SPACING: f32 = 12.0;
    let (rect, _) = ui.allocate_exact_size(vec2(SPACING * length as f32, 12.0), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }
    for i in 0..length {
        let center = egui::pos2(rect.left() + SPACING * (i as f32 + 0.5), rect.center().y);
        let (radius, color) = if i == step {
            (4.0, theme::ACCENT)
        } else {
            (3.0, theme::BORDER)
        };
        ui.painter().circle_filled(center, radius, color);
    }
}
