//! Add-user screen: registration form, summary and the operator's history.

use chrono::{Datelike, Local, NaiveDate};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{ARROW_COUNTER_CLOCKWISE, CHECK, X};

use super::app::App;
use super::components::{back_button, card_frame, colors, password_field, primary_button};
use crate::models::Role;
use crate::models::history::DISPLAY_FORMAT;
use crate::registration::RegistrationSummary;

/// Initial date shown when the birthday picker is first opened.
fn default_birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// Show the add-user screen.
pub fn show(app: &mut App, ui: &mut Ui) {
    if back_button(ui, "Go Back") {
        app.nav.close_add_user();
        return;
    }
    ui.add_space(10.0);

    // Role tabs
    ui.horizontal(|ui| {
        for role in Role::ALL {
            let text = RichText::new(format!("Create {}", role)).size(16.0);
            if ui
                .add_enabled(
                    !app.add_user.submitting,
                    egui::Button::selectable(app.add_user.role == role, text),
                )
                .clicked()
            {
                app.add_user.switch_role(role);
            }
        }
    });
    ui.separator();
    ui.add_space(10.0);

    let available_width = ui.available_width();
    let form_width = (available_width * 0.55).max(380.0);
    let side_width = (available_width - form_width - 30.0).max(260.0);

    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(form_width);
            show_form(app, ui);
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            ui.set_width(side_width);
            show_summary(app, ui);
            ui.add_space(20.0);
            show_history(app, ui);
        });
    });
}

fn show_form(app: &mut App, ui: &mut Ui) {
    let submitting = app.add_user.submitting;
    let state = &mut app.add_user;
    let mismatch = state.form.password_mismatch();

    ui.label(RichText::new(format!("{} Details", state.role)).strong());
    ui.add_space(10.0);

    ui.add_enabled_ui(!submitting, |ui| {
        egui::Grid::new("add_user_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Email:");
                ui.add(egui::TextEdit::singleline(&mut state.form.email).desired_width(250.0));
                ui.end_row();

                ui.label("Password:");
                password_field(ui, &mut state.form.password, &mut state.show_password, "Password", false);
                ui.end_row();

                ui.label("Confirm Password:");
                ui.vertical(|ui| {
                    password_field(
                        ui,
                        &mut state.form.confirm_password,
                        &mut state.show_confirm,
                        "Confirm password",
                        mismatch,
                    );
                    if mismatch {
                        ui.colored_label(colors::ERROR, "Passwords do not match");
                    }
                });
                ui.end_row();

                ui.label("First Name:");
                ui.add(egui::TextEdit::singleline(&mut state.form.first_name).desired_width(250.0));
                ui.end_row();

                ui.label("Middle Name:");
                ui.add(egui::TextEdit::singleline(&mut state.form.middle_name).desired_width(250.0));
                ui.end_row();

                ui.label("Last Name:");
                ui.add(egui::TextEdit::singleline(&mut state.form.last_name).desired_width(250.0));
                ui.end_row();

                ui.label("Age:");
                ui.add(egui::TextEdit::singleline(&mut state.form.age).desired_width(80.0));
                ui.end_row();

                ui.label("Birthday:");
                ui.horizontal(|ui| match &mut state.form.birthday {
                    Some(date) => {
                        ui.add(
                            DatePickerButton::new(date)
                                .id_salt("birthday_picker")
                                .start_end_years(1900..=Local::now().year()),
                        );
                        if ui.small_button(X).on_hover_text("Clear").clicked() {
                            state.form.birthday = None;
                        }
                    }
                    None => {
                        if ui.button("Set date").clicked() {
                            state.form.birthday = Some(default_birthday());
                        }
                    }
                });
                ui.end_row();

                ui.label("Address:");
                ui.add(egui::TextEdit::multiline(&mut state.form.address).desired_width(250.0).desired_rows(2));
                ui.end_row();
            });
    });

    ui.add_space(15.0);

    let mut submit = false;
    ui.horizontal(|ui| {
        if submitting {
            ui.spinner();
            ui.label("Registering...");
        } else {
            submit = primary_button(ui, CHECK, "Register").clicked();
            ui.add_space(10.0);
            if ui.button(format!("{ARROW_COUNTER_CLOCKWISE} Clear")).clicked() {
                app.add_user.form.reset();
            }
        }
    });

    if submit {
        app.submit_registration();
    }
}

fn show_summary(app: &App, ui: &mut Ui) {
    card_frame(ui).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new("Registration Summary").strong());
        ui.add_space(10.0);

        match &app.add_user.summary {
            Some(summary) => summary_grid(ui, summary),
            None => {
                ui.label(RichText::new("No Registration Info").weak());
            }
        }
    });
}

fn summary_grid(ui: &mut Ui, summary: &RegistrationSummary) {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    egui::Grid::new("summary_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Role:");
            ui.label(summary.role.label());
            ui.end_row();

            if let Some(staff_id) = summary.staff_id {
                ui.label("Staff ID:");
                ui.label(RichText::new(staff_id.to_string()).monospace());
                ui.end_row();
            }

            ui.label("Email:");
            ui.label(&summary.email);
            ui.end_row();

            ui.label("First Name:");
            ui.label(or_dash(&summary.first_name));
            ui.end_row();

            ui.label("Middle Name:");
            ui.label(or_dash(&summary.middle_name));
            ui.end_row();

            ui.label("Last Name:");
            ui.label(or_dash(&summary.last_name));
            ui.end_row();

            ui.label("Age:");
            ui.label(summary.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string()));
            ui.end_row();

            ui.label("Birthday:");
            ui.label(
                summary
                    .birthday
                    .map(|d| d.format("%B %-d, %Y").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
            ui.end_row();

            ui.label("Address:");
            ui.label(or_dash(&summary.address));
            ui.end_row();

            ui.label("Registered:");
            ui.label(summary.registered_at.format(DISPLAY_FORMAT).to_string());
            ui.end_row();

            ui.label("Credentials:");
            ui.label(RichText::new(summary.credentials_path.display().to_string()).small());
            ui.end_row();
        });
}

fn show_history(app: &App, ui: &mut Ui) {
    let offset = app.config.registration.offset();

    card_frame(ui).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new("Admin Registration History").strong());
            if app.add_user.history_loading {
                ui.spinner();
            }
        });
        ui.add_space(10.0);

        ScrollArea::vertical().id_salt("history_scroll").max_height(260.0).show(ui, |ui| {
            if app.add_user.history.is_empty() {
                ui.label(RichText::new("No records found.").weak());
            } else {
                for entry in &app.add_user.history {
                    ui.label(entry.describe(&offset));
                    ui.add_space(4.0);
                }
            }
        });
    });
}
