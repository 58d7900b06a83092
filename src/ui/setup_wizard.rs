//! First-run setup wizard for configuration.

use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui::{self, RichText};

use crate::backend::BackendClient;
use crate::config::{AppConfig, BackendConfig};

use super::components::colors;

/// Connection test state.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Backend connection test state.
    pub backend_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Timeout input as string for text editing.
    timeout_input: String,
    /// UTC offset input as string.
    offset_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        let config = AppConfig::default();
        Self {
            current_step: 0,
            timeout_input: config.backend.timeout_secs.to_string(),
            offset_input: config.registration.utc_offset_hours.to_string(),
            config,
            backend_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true,
            1 => self.backend_test_state == ConnectionTestState::Success,
            2 => self.config.validate().is_ok(),
            3 => true,
            _ => false,
        }
    }

    /// Backend settings changed; a previous test no longer applies.
    fn backend_edited(&mut self) {
        self.backend_test_state = ConnectionTestState::NotTested;
    }

    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "Backend Connection",
            2 => "Registration Settings",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub config_path: PathBuf,
    pub rt: tokio::runtime::Runtime,
    backend_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            config_path,
            rt,
            backend_test_rx: None,
        }
    }

    /// Test backend connection asynchronously.
    fn start_backend_test(&mut self) {
        let backend = self.wizard.config.backend.clone();
        let (tx, rx) = mpsc::channel();
        self.backend_test_rx = Some(rx);
        self.wizard.backend_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_backend_connection(&backend).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.backend_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.backend_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.backend_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_test_results();

        if self.wizard.backend_test_state == ConnectionTestState::Testing {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Library Link Admin Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                let needs_backend_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_backend_step(ui, &mut self.wizard),
                    2 => {
                        show_registration_step(ui, &mut self.wizard);
                        false
                    }
                    3 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_backend_test {
                    self.start_backend_test();
                }

                ui.add_space(30.0);
                ui.separator();

                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Save & Exit").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Config written to {}", self.config_path.display());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    tracing::error!("Failed to save config: {}", e);
                    self.initial_error = Some(format!("Failed to save config: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to Library Link Admin!");
    ui.add_space(10.0);
    ui.label("This wizard will help you configure the application.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - Your backend project URL");
    ui.label("  - The project's public (anon) API key");
}

fn show_backend_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;
    let mut edited = false;

    egui::Grid::new("backend_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Project URL:");
            edited |= ui.text_edit_singleline(&mut wizard.config.backend.url).changed();
            ui.end_row();

            ui.label("Anon key:");
            edited |= ui
                .add(egui::TextEdit::singleline(&mut wizard.config.backend.anon_key).password(true))
                .changed();
            ui.end_row();

            ui.label("Timeout (seconds):");
            if ui.text_edit_singleline(&mut wizard.timeout_input).changed()
                && let Ok(t) = wizard.timeout_input.trim().parse()
            {
                wizard.config.backend.timeout_secs = t;
                edited = true;
            }
            ui.end_row();
        });

    if edited {
        wizard.backend_edited();
    }

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = wizard.backend_test_state == ConnectionTestState::Testing;
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.backend_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(colors::SUCCESS, "Connection successful!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
            }
        }
    });

    needs_test
}

fn show_registration_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    ui.label("Settings used when registering new admins and staff.");
    ui.add_space(10.0);

    egui::Grid::new("registration_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Registry UTC offset (hours):");
            if ui.text_edit_singleline(&mut wizard.offset_input).changed()
                && let Ok(h) = wizard.offset_input.trim().parse()
            {
                wizard.config.registration.utc_offset_hours = h;
            }
            ui.end_row();

            ui.label("Credentials folder:");
            ui.add(
                egui::TextEdit::singleline(&mut wizard.config.registration.credentials_dir)
                    .hint_text("Downloads"),
            );
            ui.end_row();

            ui.label("Log level:");
            ui.text_edit_singleline(&mut wizard.config.logging.level);
            ui.end_row();

            ui.label("Log file:");
            ui.checkbox(&mut wizard.config.logging.file, "Write a daily log file");
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e.to_string());
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, config_path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Backend");
        ui.label(format!("  {}", wizard.config.backend.base_url()));
        ui.label(format!("  Timeout: {} seconds", wizard.config.backend.timeout_secs));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Registration");
        ui.label(format!("  UTC offset: {:+} hours", wizard.config.registration.utc_offset_hours));
        ui.label(format!(
            "  Credentials folder: {}",
            wizard.config.registration.credentials_dir().display()
        ));
    });

    ui.add_space(20.0);
    ui.label(format!("Config file: {}", config_path.display()));
    ui.label("Click 'Save & Exit' to save and close the wizard.");
    ui.label("You will need to restart the application after setup.");
}

/// Test backend connection via the auth health endpoint.
async fn test_backend_connection(backend: &BackendConfig) -> Result<(), String> {
    backend.validate().map_err(|e| e.to_string())?;
    let client = BackendClient::new(backend).map_err(|e| e.to_string())?;
    client.health().await.map_err(|e| e.to_string())
}
