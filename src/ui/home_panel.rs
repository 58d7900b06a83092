//! Home section with user counts, quick actions and activity log.

use eframe::egui::{Color32, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, USER_PLUS};

use super::app::{App, LogLevel};
use super::components::{card_frame, colors};
use super::nav::{MenuItem, Section};

/// Show the home section.
pub fn show(app: &mut App, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        let greeting = match &app.admin {
            Some(admin) => format!("Welcome, {}", admin.display_first_name()),
            None => "Welcome".to_string(),
        };
        ui.label(RichText::new(greeting).size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Library account administration").size(14.0).weak());

        ui.add_space(30.0);

        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 340.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            let (admins, staff) = if app.directory.loaded {
                (app.directory.admins.len().to_string(), app.directory.staff.len().to_string())
            } else {
                ("-".to_string(), "-".to_string())
            };
            stat_card(ui, "Admins", &admins, "Console administrators");
            stat_card(ui, "Staff", &staff, "Registered staff members");
        });

        ui.add_space(30.0);
    });

    let available_width = ui.available_width();
    let column_width = (available_width - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);

            card_frame(ui).show(ui, |ui| {
                ui.set_min_width(column_width - 30.0);

                ui.label(RichText::new("Quick Actions").strong());
                ui.add_space(10.0);

                if ui.button(format!("{USER_PLUS} Add User")).clicked() {
                    app.nav.select(MenuItem::Section(Section::UserManagement));
                    app.open_add_user();
                }

                ui.add_space(5.0);

                ui.add_enabled_ui(!app.users_loading, |ui| {
                    if ui.button(format!("{ARROWS_CLOCKWISE} Refresh Users")).clicked() {
                        app.load_users();
                    }
                });
            });
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);

            card_frame(ui).show(ui, |ui| {
                ui.set_min_width(column_width - 30.0);

                ui.label(RichText::new("Recent Activity").strong());
                ui.add_space(10.0);

                ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                    if app.log_messages.is_empty() {
                        ui.label(RichText::new("No recent activity").weak());
                    } else {
                        for entry in app.log_messages.iter().rev().take(10) {
                            let color = match entry.level {
                                LogLevel::Info => Color32::GRAY,
                                LogLevel::Success => colors::SUCCESS,
                                LogLevel::Warning => colors::WARNING,
                                LogLevel::Error => colors::ERROR,
                            };

                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                        .small()
                                        .color(Color32::DARK_GRAY),
                                );
                                ui.label(RichText::new(&entry.message).color(color));
                            });
                        }
                    }
                });
            });
        });
    });
}

fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    card_frame(ui).outer_margin(Margin::same(5)).show(ui, |ui| {
        ui.set_min_width(150.0);

        ui.vertical(|ui| {
            ui.label(RichText::new(title).small());
            ui.label(RichText::new(value).heading().strong());
            ui.label(RichText::new(subtitle).small().weak());
        });
    });
}
