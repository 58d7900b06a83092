//! Settings section for backend, registration and logging configuration.

use eframe::egui::{self, RichText};

use super::app::App;
use super::components::{colors, panel_header};
use crate::config::{LoggingConfig, RegistrationConfig};

/// Show the settings section.
pub fn show(app: &mut App, ui: &mut egui::Ui) {
    panel_header(ui, "Settings");

    // Backend Connection
    ui.group(|ui| {
        ui.heading("Backend Connection");
        ui.add_space(5.0);

        egui::Grid::new("backend_settings_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Project URL:");
                if ui.text_edit_singleline(&mut app.config.backend.url).changed() {
                    app.config_modified = true;
                    app.backend_test_status = None;
                }
                ui.end_row();

                ui.label("Anon key:");
                if ui
                    .add(egui::TextEdit::singleline(&mut app.config.backend.anon_key).password(true))
                    .changed()
                {
                    app.config_modified = true;
                    app.backend_test_status = None;
                }
                ui.end_row();

                ui.label("Timeout (seconds):");
                let mut timeout_str = app.config.backend.timeout_secs.to_string();
                if ui.text_edit_singleline(&mut timeout_str).changed()
                    && let Ok(timeout) = timeout_str.trim().parse()
                {
                    app.config.backend.timeout_secs = timeout;
                    app.config_modified = true;
                    app.backend_test_status = None;
                }
                ui.end_row();
            });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!app.backend_test_pending, egui::Button::new("Test Backend Connection"))
                .clicked()
            {
                app.test_backend_connection();
            }

            if app.backend_test_pending {
                ui.spinner();
            }

            match &app.backend_test_status {
                Some(Ok(())) => {
                    ui.label(RichText::new("Connected").color(colors::SUCCESS));
                }
                Some(Err(e)) => {
                    ui.label(RichText::new(format!("Failed: {e}")).color(colors::ERROR));
                }
                None => {}
            }
        });
    });

    ui.add_space(15.0);

    // Registration
    ui.group(|ui| {
        ui.heading("Registration");
        ui.add_space(5.0);

        egui::Grid::new("registration_settings_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Registry UTC offset (hours):");
                let mut offset_str = app.config.registration.utc_offset_hours.to_string();
                if ui.text_edit_singleline(&mut offset_str).changed()
                    && let Ok(hours) = offset_str.trim().parse()
                {
                    app.config.registration.utc_offset_hours = hours;
                    app.config_modified = true;
                }
                ui.end_row();

                ui.label("Credentials folder:");
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut app.config.registration.credentials_dir)
                            .hint_text("Downloads"),
                    )
                    .changed()
                {
                    app.config_modified = true;
                }
                ui.end_row();

                ui.label("");
                ui.label(
                    RichText::new(format!(
                        "Writing to {}",
                        app.config.registration.credentials_dir().display()
                    ))
                    .small()
                    .weak(),
                );
                ui.end_row();
            });
    });

    ui.add_space(15.0);

    // Logging
    ui.group(|ui| {
        ui.heading("Logging");
        ui.add_space(5.0);

        egui::Grid::new("logging_settings_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Level:");
                if ui.text_edit_singleline(&mut app.config.logging.level).changed() {
                    app.config_modified = true;
                }
                ui.end_row();

                ui.label("Log file:");
                if ui.checkbox(&mut app.config.logging.file, "Write a daily log file").changed() {
                    app.config_modified = true;
                }
                ui.end_row();
            });

        ui.label(RichText::new("Logging changes apply after restart.").small().weak());
    });

    ui.add_space(20.0);

    // Action buttons
    ui.horizontal(|ui| {
        let save_btn = egui::Button::new("Save Settings");
        if ui.add_enabled(app.config_modified, save_btn).clicked() {
            app.save_config();
        }

        if app.config_modified {
            ui.label(RichText::new("(unsaved changes)").color(colors::WARNING).italics());
        }

        if ui.button("Reset to Defaults").clicked() {
            app.config.registration = RegistrationConfig::default();
            app.config.logging = LoggingConfig::default();
            app.config_modified = true;
        }
    });

    ui.add_space(10.0);
    ui.label(RichText::new(format!("Config file: {}", app.config_path.display())).small().weak());
}
