//! User management listing with search and admin/staff switch.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, MAGNIFYING_GLASS, USER_PLUS};

use super::app::App;
use super::components::{colors, panel_header, primary_button};
use crate::models::Role;
use crate::search::{DirectoryEntry, format_created, initials};

/// Show the user management section.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "User Management");

    // Toolbar: search, add, refresh
    ui.horizontal(|ui| {
        ui.label(MAGNIFYING_GLASS);
        ui.add(
            egui::TextEdit::singleline(&mut app.directory.query)
                .desired_width(260.0)
                .hint_text("Search by Name or Email"),
        );

        ui.add_space(10.0);

        if primary_button(ui, USER_PLUS, "Add User").clicked() {
            app.open_add_user();
        }

        ui.add_space(10.0);

        ui.add_enabled_ui(!app.users_loading, |ui| {
            if ui.button(format!("{ARROWS_CLOCKWISE} Refresh")).clicked() {
                app.load_users();
            }
        });
        if app.users_loading {
            ui.spinner();
        }
    });

    ui.add_space(10.0);

    // Role switch
    ui.horizontal(|ui| {
        for role in Role::ALL {
            if ui.selectable_label(app.directory.view == role, role.label()).clicked() {
                app.directory.view = role;
            }
        }
        ui.add_space(20.0);
        ui.label(RichText::new(format!("Viewing: {}", app.directory.view)).strong());
    });

    ui.add_space(10.0);

    if !app.directory.loaded {
        if !app.users_loading {
            ui.label(RichText::new("No users loaded.").weak());
        }
        return;
    }

    let (shown, total) = app.directory.counts();
    ui.label(format!("Showing {} of {}", shown, total));
    ui.add_space(10.0);

    if shown == 0 {
        let text = if app.directory.query.trim().is_empty() {
            "No records found."
        } else {
            "No results found for your search."
        };
        ui.colored_label(colors::NEUTRAL, text);
        return;
    }

    match app.directory.view {
        Role::Admin => show_admin_table(app, ui),
        Role::Staff => show_staff_table(app, ui),
    }
}

fn show_admin_table(app: &App, ui: &mut Ui) {
    ScrollArea::vertical().id_salt("admin_scroll").show(ui, |ui| {
        egui::Grid::new("admin_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("");
                ui.strong("Name");
                ui.strong("Email");
                ui.strong("Created");
                ui.strong("Status");
                ui.end_row();

                for admin in app.directory.visible_admins() {
                    let name = admin.display_name();
                    ui.label(RichText::new(initials(&name)).strong().color(colors::PRIMARY));
                    ui.label(name);
                    ui.label(admin.email());
                    ui.label(format_created(admin.created_at()));
                    status_label(ui, admin.status_label());
                    ui.end_row();
                }
            });
    });
}

fn show_staff_table(app: &App, ui: &mut Ui) {
    ScrollArea::vertical().id_salt("staff_scroll").show(ui, |ui| {
        egui::Grid::new("staff_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Staff ID");
                ui.strong("Name");
                ui.strong("Email");
                ui.strong("Created");
                ui.strong("Status");
                ui.end_row();

                for staff in app.directory.visible_staff() {
                    ui.label(RichText::new(staff.staff_id.to_string()).monospace());
                    ui.label(staff.display_name());
                    ui.label(staff.email());
                    ui.label(format_created(staff.created_at()));
                    status_label(ui, staff.status_label());
                    ui.end_row();
                }
            });
    });
}

fn status_label(ui: &mut Ui, status: &str) {
    let color = if status.eq_ignore_ascii_case("active") {
        colors::SUCCESS
    } else {
        colors::WARNING
    };
    ui.colored_label(color, status);
}
