//! Login screen.

use eframe::egui::{self, Key, RichText};
use egui_phosphor::regular::SIGN_IN;

use super::app::App;
use super::components::{card_frame, colors, password_field, primary_button};

/// Show the login screen.
pub fn show(app: &mut App, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.15);

            ui.label(RichText::new("Library Link Admin").size(32.0).strong());
            ui.add_space(5.0);
            ui.label(RichText::new("Sign in to manage library accounts").size(14.0).weak());
            ui.add_space(30.0);

            if app.checking_session {
                ui.spinner();
                ui.label("Checking saved session...");
                return;
            }

            card_frame(ui).show(ui, |ui| {
                ui.set_width(320.0);
                let mut submit = false;

                ui.label("Email");
                let email = ui.add_enabled(
                    !app.login.loading,
                    egui::TextEdit::singleline(&mut app.login.email)
                        .hint_text("you@library.ph")
                        .desired_width(f32::INFINITY),
                );
                submit |= email.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                ui.add_space(10.0);

                ui.label("Password");
                let password = ui
                    .add_enabled_ui(!app.login.loading, |ui| {
                        password_field(
                            ui,
                            &mut app.login.password,
                            &mut app.login.show_password,
                            "Password",
                            false,
                        )
                    })
                    .inner;
                submit |= password.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

                if let Some(error) = &app.login.error {
                    ui.add_space(10.0);
                    ui.colored_label(colors::ERROR, error);
                }

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    if app.login.loading {
                        ui.spinner();
                        ui.label("Logging in...");
                    } else if primary_button(ui, SIGN_IN, "Login").clicked() {
                        submit = true;
                    }
                });

                if submit {
                    app.submit_login();
                }
            });
        });
    });
}
