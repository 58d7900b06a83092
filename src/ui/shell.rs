//! Dashboard shell: top bar, drawer menu and section dispatch.

use eframe::egui::{self, Align, Layout, RichText};
use egui_phosphor::regular::{
    BELL, CARET_DOWN, CARET_RIGHT, CHART_LINE, ENVELOPE, FILE_TEXT, GEAR, HOUSE, LIST, NEWSPAPER, SIGN_OUT,
    USER, USER_CIRCLE, USERS,
};

use super::app::App;
use super::components::coming_soon;
use super::nav::{MenuItem, Section, View};
use super::{add_user_panel, home_panel, profile_panel, settings_panel, users_panel};

fn section_icon(section: Section) -> &'static str {
    match section {
        Section::Home => HOUSE,
        Section::Profile => USER,
        Section::UserManagement => USERS,
        Section::Graphs => CHART_LINE,
        Section::Reports => FILE_TEXT,
        Section::Forms => FILE_TEXT,
        Section::Emails => ENVELOPE,
        Section::Settings => GEAR,
    }
}

/// Show the dashboard.
pub fn show(app: &mut App, ctx: &egui::Context) {
    show_top_bar(app, ctx);

    if app.nav.drawer_open {
        show_drawer(app, ctx);
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            match app.nav.view() {
                View::AddUser => add_user_panel::show(app, ui),
                View::Section(Section::Home) => home_panel::show(app, ui),
                View::Section(Section::Profile) => profile_panel::show(app, ui),
                View::Section(Section::UserManagement) => users_panel::show(app, ui),
                View::Section(Section::Settings) => settings_panel::show(app, ui),
                View::Section(section) => coming_soon(ui, section.name()),
            }
        });
    });
}

fn show_top_bar(app: &mut App, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_bar").min_height(40.0).show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            if ui.button(RichText::new(LIST).size(18.0)).on_hover_text("Menu").clicked() {
                if app.nav.drawer_open {
                    app.nav.close_drawer();
                } else {
                    app.nav.open_drawer();
                }
            }

            ui.label(RichText::new("Library Link Admin").size(18.0).strong());

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let mut sign_out = false;
                ui.menu_button(RichText::new(USER_CIRCLE).size(20.0), |ui| {
                    if let Some(admin) = &app.admin {
                        ui.label(RichText::new(admin.full_name()).strong());
                        if let Some(email) = &admin.email {
                            ui.label(RichText::new(email).weak());
                        }
                        ui.separator();
                    }
                    if ui.button(format!("{USER} Profile")).clicked() {
                        app.nav.select(MenuItem::Section(Section::Profile));
                        ui.close();
                    }
                    if ui.button(format!("{SIGN_OUT} Logout")).clicked() {
                        sign_out = true;
                        ui.close();
                    }
                });

                ui.label(RichText::new(BELL).size(18.0)).on_hover_text("Notifications");

                let name = app
                    .admin
                    .as_ref()
                    .map(|a| a.display_first_name().to_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    ui.spinner();
                } else {
                    ui.label(name);
                }

                if sign_out {
                    app.sign_out();
                }
            });
        });
    });
}

fn show_drawer(app: &mut App, ctx: &egui::Context) {
    egui::SidePanel::left("drawer")
        .resizable(false)
        .exact_width(220.0)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            let active = match app.nav.view() {
                View::Section(section) => Some(section),
                View::AddUser => None,
            };

            for item in MenuItem::TOP_LEVEL {
                match item {
                    MenuItem::Section(section) => {
                        let text = format!("{} {}", section_icon(section), section.name());
                        if ui.selectable_label(active == Some(section), text).clicked() {
                            app.nav.select(item);
                        }
                    }
                    MenuItem::Updates => {
                        let caret = if app.nav.updates_open { CARET_DOWN } else { CARET_RIGHT };
                        let text = format!("{NEWSPAPER} {} {caret}", item.name());
                        if ui.selectable_label(false, text).clicked() {
                            app.nav.select(item);
                        }
                        if app.nav.updates_open {
                            ui.indent("updates_children", |ui| {
                                for section in MenuItem::UPDATES {
                                    let text = format!("{} {}", section_icon(section), section.name());
                                    if ui.selectable_label(active == Some(section), text).clicked() {
                                        app.nav.select(MenuItem::Section(section));
                                    }
                                }
                            });
                        }
                    }
                }
                ui.add_space(4.0);
            }
        });
}
