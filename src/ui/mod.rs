//! GUI screens and application state.

pub mod add_user_panel;
pub mod app;
pub mod components;
pub mod home_panel;
pub mod login;
pub mod nav;
pub mod profile_panel;
pub mod settings_panel;
pub mod setup_wizard;
pub mod shell;
pub mod users_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
