//! Shared UI components.

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Ui};
use egui_phosphor::regular::{ARROW_LEFT, EYE, EYE_SLASH};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(25, 118, 210);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui, label: &str) -> bool {
    ui.button(RichText::new(format!("{ARROW_LEFT} {label}")).size(14.0))
        .clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Filled button for the main action of a screen.
pub fn primary_button(ui: &mut Ui, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add(
        egui::Button::new(RichText::new(label).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(90.0, 28.0)),
    )
}

/// Password input with a show/hide toggle.
pub fn password_field(ui: &mut Ui, value: &mut String, visible: &mut bool, hint: &str, error: bool) -> Response {
    ui.horizontal(|ui| {
        let mut edit = egui::TextEdit::singleline(value)
            .password(!*visible)
            .hint_text(hint)
            .desired_width(220.0);
        if error {
            edit = edit.text_color(colors::ERROR);
        }
        let response = ui.add(edit);

        let icon = if *visible { EYE_SLASH } else { EYE };
        if ui.small_button(icon).on_hover_text("Show/hide").clicked() {
            *visible = !*visible;
        }
        response
    })
    .inner
}

/// Rounded frame used for cards and side boxes.
pub fn card_frame(ui: &Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
}

/// Placeholder for sections without content yet.
pub fn coming_soon(ui: &mut Ui, title: &str) {
    panel_header(ui, title);
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(format!("{title} - Coming Soon")).weak());
    });
}
