//! Profile section for the signed-in admin.

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::SIGN_OUT;

use super::app::App;
use super::components::{card_frame, panel_header};

/// Show the profile section.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Profile");

    let Some(admin) = app.admin.clone() else {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading profile...");
        });
        return;
    };

    card_frame(ui).show(ui, |ui| {
        ui.set_min_width(360.0);
        ui.label(RichText::new(admin.full_name()).size(20.0).strong());
        ui.add_space(10.0);

        egui::Grid::new("profile_grid")
            .num_columns(2)
            .spacing([20.0, 8.0])
            .show(ui, |ui| {
                ui.label("Email:");
                ui.label(admin.email.as_deref().unwrap_or("-"));
                ui.end_row();

                ui.label("Admin ID:");
                ui.label(RichText::new(&admin.admin_uuid).monospace());
                ui.end_row();

                if let Some(session) = &app.session {
                    ui.label("Session expires:");
                    ui.label(
                        session
                            .expires_at
                            .with_timezone(&chrono::Local)
                            .format("%B %-d, %Y at %-I:%M %p")
                            .to_string(),
                    );
                    ui.end_row();
                }
            });
    });

    ui.add_space(20.0);

    if ui.button(format!("{SIGN_OUT} Logout")).clicked() {
        app.sign_out();
    }
}
