//! Main application state.

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use eframe::egui;
use tokio::sync::mpsc;

use crate::backend::{BackendClient, Session, SessionStore, ensure_fresh};
use crate::config::AppConfig;
use crate::db;
use crate::models::{Admin, AdminHistoryEntry, AdminProfile, Role, Staff};
use crate::registration::{Registrar, RegistrationForm, RegistrationSummary};
use crate::search::UserDirectory;

use super::components::colors;
use super::nav::{NavState, Route};
use super::{login, shell};

/// How long the success toast stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Session
    SessionRestored(Session),
    NoStoredSession,
    LoginSucceeded(Session),
    LoginFailed(String),
    SessionRefreshed(Session),
    SessionExpired(String),
    AdminLoaded(AdminProfile),
    AdminMissing(String),

    // Data loading
    UsersLoaded { admins: Vec<Admin>, staff: Vec<Staff> },
    UsersLoadFailed(String),
    HistoryLoaded(Vec<AdminHistoryEntry>),
    HistoryLoadFailed(String),

    // Registration
    Registered(Box<RegistrationSummary>),
    RegistrationFailed(String),

    // Settings
    BackendTestResult(Result<(), String>),
}

impl UiMessage {
    /// Results that only make sense while the session that requested them is live.
    fn needs_session(&self) -> bool {
        matches!(
            self,
            UiMessage::SessionRefreshed(_)
                | UiMessage::SessionExpired(_)
                | UiMessage::AdminLoaded(_)
                | UiMessage::AdminMissing(_)
                | UiMessage::UsersLoaded { .. }
                | UiMessage::UsersLoadFailed(_)
                | UiMessage::HistoryLoaded(_)
                | UiMessage::HistoryLoadFailed(_)
        )
    }
}

/// Login screen state.
#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub error: Option<String>,
    pub loading: bool,
}

/// Add-user screen state.
#[derive(Default)]
pub struct AddUserState {
    pub role: Role,
    pub form: RegistrationForm,
    pub show_password: bool,
    pub show_confirm: bool,
    pub summary: Option<RegistrationSummary>,
    pub history: Vec<AdminHistoryEntry>,
    pub history_loading: bool,
    pub submitting: bool,
}

impl AddUserState {
    /// Switch the role tab, clearing the form and summary.
    pub fn switch_role(&mut self, role: Role) {
        if self.role == role {
            return;
        }
        self.role = role;
        self.form.reset();
        self.summary = None;
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Transient notification.
pub struct Notification {
    pub message: String,
    pub expires: Instant,
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub client: BackendClient,
    store: SessionStore,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Configuration
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub config_modified: bool,
    pub backend_test_status: Option<Result<(), String>>,
    pub backend_test_pending: bool,

    // Session
    pub route: Route,
    pub checking_session: bool,
    pub session: Option<Session>,
    pub admin: Option<AdminProfile>,

    // Screens
    pub nav: NavState,
    pub login: LoginForm,
    pub directory: UserDirectory,
    pub users_loading: bool,
    pub add_user: AddUserState,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Dialogs
    pub error_message: Option<String>,
    pub notification: Option<Notification>,
}

impl App {
    pub fn new(
        client: BackendClient,
        store: SessionStore,
        config: AppConfig,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            client,
            store,
            tx,
            rx,
            config,
            config_path,
            config_modified: false,
            backend_test_status: None,
            backend_test_pending: false,
            route: Route::Login,
            checking_session: false,
            session: None,
            admin: None,
            nav: NavState::default(),
            login: LoginForm::default(),
            directory: UserDirectory::default(),
            users_loading: false,
            add_user: AddUserState::default(),
            log_messages: Vec::new(),
            error_message: None,
            notification: None,
        };

        app.restore_session();
        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Show a transient notification.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            expires: Instant::now() + NOTIFICATION_TTL,
        });
    }

    /// Run `op` with a fresh session, refreshing the tokens first if needed.
    fn spawn_with_session<F, Fut>(&mut self, op: F)
    where
        F: FnOnce(BackendClient, Session) -> Fut + Send + 'static,
        Fut: Future<Output = UiMessage> + Send + 'static,
    {
        let Some(session) = self.session.clone() else {
            self.route_to_login(Some("Please log in.".to_string()));
            return;
        };
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let session = match ensure_fresh(&client, session).await {
                Ok((session, refreshed)) => {
                    if refreshed {
                        let _ = tx.send(UiMessage::SessionRefreshed(session.clone()));
                    }
                    session
                }
                Err(e) => {
                    tracing::warn!("Session refresh failed: {}", e);
                    let _ = tx.send(UiMessage::SessionExpired(e.to_string()));
                    return;
                }
            };
            let _ = tx.send(op(client, session).await);
        });
    }

    /// Check for a stored session on startup.
    fn restore_session(&mut self) {
        let client = self.client.clone();
        let store = self.store.clone();
        let tx = self.tx.clone();
        self.checking_session = true;

        self.rt.spawn(async move {
            let Some(stored) = store.load() else {
                let _ = tx.send(UiMessage::NoStoredSession);
                return;
            };

            let restored = match ensure_fresh(&client, stored).await {
                Ok((session, _)) => client.get_user(&session.access_token).await.map(|_| session),
                Err(e) => Err(e),
            };

            match restored {
                Ok(session) => {
                    let _ = tx.send(UiMessage::SessionRestored(session));
                }
                Err(e) => {
                    tracing::info!("Stored session is no longer valid: {}", e);
                    if let Err(e) = store.clear() {
                        tracing::warn!("Failed to clear session file: {}", e);
                    }
                    let _ = tx.send(UiMessage::NoStoredSession);
                }
            }
        });
    }

    /// Submit the login form.
    pub fn submit_login(&mut self) {
        if self.login.loading {
            return;
        }
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.login.error = Some("Email and password are required.".to_string());
            return;
        }

        self.login.error = None;
        self.login.loading = true;

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let message = match client.sign_in_with_password(&email, &password).await {
                Ok(session) => UiMessage::LoginSucceeded(session),
                Err(e) => UiMessage::LoginFailed(e.to_string()),
            };
            let _ = tx.send(message);
        });
    }

    /// Persist the session and enter the dashboard.
    fn enter_dashboard(&mut self, session: Session) {
        self.persist_session(&session);
        self.session = Some(session);
        self.route = Route::Dashboard;
        self.nav = NavState::default();
        self.login = LoginForm::default();
        self.load_admin();
        self.load_users();
    }

    fn persist_session(&mut self, session: &Session) {
        if let Err(e) = self.store.save(session) {
            tracing::warn!("Failed to store session: {}", e);
            self.log_warning(format!("Session not saved: {e}"));
        }
    }

    /// Drop all signed-in state and show the login screen.
    fn route_to_login(&mut self, error: Option<String>) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear session file: {}", e);
        }
        self.session = None;
        self.admin = None;
        self.directory = UserDirectory::default();
        self.add_user = AddUserState::default();
        self.nav = NavState::default();
        self.users_loading = false;
        self.route = Route::Login;
        self.login.loading = false;
        self.login.error = error;
    }

    /// Sign out remotely and locally.
    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.clone() {
            let client = self.client.clone();
            self.rt.spawn(async move {
                if let Err(e) = client.sign_out(&session.access_token).await {
                    tracing::warn!("Remote sign-out failed: {}", e);
                }
            });
        }
        self.log_info("Signed out");
        self.route_to_login(None);
    }

    /// Resolve the signed-in user's admin profile.
    pub fn load_admin(&mut self) {
        self.spawn_with_session(|client, session| async move {
            let lookup = async {
                let user = client.get_user(&session.access_token).await?;
                let email = user.require_email()?;
                db::admin::find_by_email(&client, &session.access_token, email).await
            };
            match lookup.await {
                Ok(admin) => UiMessage::AdminLoaded(admin),
                Err(e) if e.is_unauthorized() => UiMessage::SessionExpired(e.to_string()),
                Err(e) => {
                    tracing::error!("Admin info not found: {}", e);
                    UiMessage::AdminMissing(format!("Admin info not found: {e}"))
                }
            }
        });
    }

    /// Load admins and staff for the listing.
    pub fn load_users(&mut self) {
        self.users_loading = true;
        self.spawn_with_session(|client, session| async move {
            let token = session.access_token.as_str();
            let admins = match db::admin::list_all(&client, token).await {
                Ok(admins) => admins,
                Err(e) => return UiMessage::UsersLoadFailed(e.to_string()),
            };
            match db::staff::list_all(&client, token).await {
                Ok(staff) => UiMessage::UsersLoaded { admins, staff },
                Err(e) => UiMessage::UsersLoadFailed(e.to_string()),
            }
        });
    }

    /// Load the acting admin's registration history.
    pub fn load_history(&mut self) {
        self.add_user.history_loading = true;
        let known_uuid = self.admin.as_ref().map(|a| a.admin_uuid.clone());

        self.spawn_with_session(|client, session| async move {
            let token = session.access_token.as_str();
            let history = async {
                let uuid = match known_uuid {
                    Some(uuid) => uuid,
                    None => {
                        let user = client.get_user(token).await?;
                        db::admin::find_by_email(&client, token, user.require_email()?)
                            .await?
                            .admin_uuid
                    }
                };
                db::history::list_for_admin(&client, token, &uuid).await
            };
            match history.await {
                Ok(entries) => UiMessage::HistoryLoaded(entries),
                Err(e) => UiMessage::HistoryLoadFailed(e.to_string()),
            }
        });
    }

    /// Open the add-user overlay and refresh its history panel.
    pub fn open_add_user(&mut self) {
        self.nav.open_add_user();
        self.load_history();
    }

    /// Validate the form and run the registration flow.
    pub fn submit_registration(&mut self) {
        if self.add_user.submitting {
            return;
        }
        let request = match self.add_user.form.validate(self.add_user.role) {
            Ok(request) => request,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        self.add_user.submitting = true;
        self.log_info(format!("Registering {} {}", request.role, request.email));

        let offset = self.config.registration.offset();
        let credentials_dir = self.config.registration.credentials_dir();

        self.spawn_with_session(move |client, session| async move {
            let registrar = Registrar::new(&client, &session, offset, &credentials_dir);
            match registrar.register(request).await {
                Ok(summary) => UiMessage::Registered(Box::new(summary)),
                Err(e) => UiMessage::RegistrationFailed(e.to_string()),
            }
        });
    }

    /// Check the backend settings currently in the form.
    pub fn test_backend_connection(&mut self) {
        let backend = self.config.backend.clone();
        let tx = self.tx.clone();
        self.backend_test_pending = true;
        self.backend_test_status = None;

        self.rt.spawn(async move {
            let result = match BackendClient::new(&backend) {
                Ok(client) => client.health().await.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(UiMessage::BackendTestResult(result));
        });
    }

    /// Validate and write the configuration file.
    pub fn save_config(&mut self) {
        if let Err(e) = self.config.validate() {
            self.error_message = Some(e.to_string());
            return;
        }
        match self.config.save(&self.config_path) {
            Ok(()) => {
                self.config_modified = false;
                self.notify("Settings saved. Backend changes apply after restart.");
                self.log_success(format!("Settings saved to {}", self.config_path.display()));
            }
            Err(e) => {
                tracing::error!("Failed to save config: {}", e);
                self.error_message = Some(format!("Failed to save settings: {e}"));
            }
        }
    }

    /// Any background work in flight.
    fn is_busy(&self) -> bool {
        self.checking_session
            || self.login.loading
            || self.users_loading
            || self.add_user.submitting
            || self.add_user.history_loading
            || self.backend_test_pending
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            // Tasks started before sign-out can still report back.
            if self.session.is_none() && msg.needs_session() {
                tracing::debug!("Dropping result that arrived after sign-out");
                continue;
            }
            match msg {
                UiMessage::SessionRestored(session) => {
                    self.checking_session = false;
                    self.log_info("Session restored");
                    self.enter_dashboard(session);
                }
                UiMessage::NoStoredSession => {
                    self.checking_session = false;
                }
                UiMessage::LoginSucceeded(session) => {
                    self.log_success(format!(
                        "Logged in as {}",
                        session.user.email.as_deref().unwrap_or("unknown")
                    ));
                    self.enter_dashboard(session);
                }
                UiMessage::LoginFailed(e) => {
                    tracing::warn!("Login failed: {}", e);
                    self.login.loading = false;
                    self.login.error = Some("Invalid credentials. Please try again.".to_string());
                }
                UiMessage::SessionRefreshed(session) => {
                    self.persist_session(&session);
                    self.session = Some(session);
                }
                UiMessage::SessionExpired(e) => {
                    self.log_warning(format!("Session expired: {e}"));
                    self.route_to_login(Some("Session expired. Please log in again.".to_string()));
                }
                UiMessage::AdminLoaded(admin) => {
                    self.admin = Some(admin);
                }
                UiMessage::AdminMissing(e) => {
                    self.log_error(e.clone());
                    self.sign_out();
                    self.login.error = Some(e);
                }
                UiMessage::UsersLoaded { admins, staff } => {
                    self.users_loading = false;
                    self.directory.replace(admins, staff);
                }
                UiMessage::UsersLoadFailed(e) => {
                    tracing::error!("Error fetching users: {}", e);
                    self.users_loading = false;
                    self.log_error(format!("Error fetching users: {e}"));
                }
                UiMessage::HistoryLoaded(entries) => {
                    self.add_user.history_loading = false;
                    self.add_user.history = entries;
                }
                UiMessage::HistoryLoadFailed(e) => {
                    tracing::error!("Failed to fetch admin history: {}", e);
                    self.add_user.history_loading = false;
                    self.log_error(format!("Failed to fetch admin history: {e}"));
                }
                UiMessage::Registered(summary) => {
                    self.add_user.submitting = false;
                    let message = format!("{} registered successfully!", summary.role);
                    self.log_success(format!("{} ({})", message, summary.email));
                    // The account exists either way; only a live session gets the summary.
                    if self.session.is_some() {
                        self.notify(message);
                        self.add_user.summary = Some(*summary);
                        self.load_history();
                        self.load_users();
                    }
                }
                UiMessage::RegistrationFailed(e) => {
                    self.add_user.submitting = false;
                    self.log_error(e.clone());
                    if self.session.is_some() {
                        self.error_message = Some(e);
                    }
                }
                UiMessage::BackendTestResult(result) => {
                    self.backend_test_pending = false;
                    match &result {
                        Ok(()) => self.log_success("Backend connection successful"),
                        Err(e) => self.log_error(format!("Backend connection failed: {e}")),
                    }
                    self.backend_test_status = Some(result);
                }
            }
        }
    }

    /// Render modal dialogs (error alert, notification toast).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        if let Some(notification) = &self.notification {
            let remaining = notification.expires.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.notification = None;
            } else {
                egui::Area::new(egui::Id::new("notification"))
                    .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.colored_label(colors::SUCCESS, &notification.message);
                        });
                    });
                ctx.request_repaint_after(remaining);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.is_busy() {
            ctx.request_repaint();
        }

        match self.route {
            Route::Login => login::show(self, ctx),
            Route::Dashboard => shell::show(self, ctx),
        }

        // Modal dialogs
        self.show_dialogs(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AuthUser;
    use crate::backend::client::tests::test_client;

    fn test_app(name: &str) -> App {
        let dir = std::env::temp_dir().join(format!("lla-app-{name}-{}", std::process::id()));
        let store = SessionStore::new(dir.join("session.json"));
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = App::new(test_client(), store, AppConfig::default(), dir.join("config.toml"), rt);

        // No session file, so the startup check reports back right away.
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.checking_session && Instant::now() < deadline {
            app.poll_async_results();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!app.checking_session);
        app
    }

    fn signed_in(app: &mut App) {
        app.session = Some(Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
            user: AuthUser {
                id: "u-1".to_string(),
                email: Some("op@library.ph".to_string()),
            },
        });
        app.route = Route::Dashboard;
    }

    #[test]
    fn test_expired_session_while_loading_users_goes_idle() {
        let mut app = test_app("expired");
        signed_in(&mut app);
        app.users_loading = true;
        assert!(app.is_busy());

        app.tx.send(UiMessage::SessionExpired("refresh failed".to_string())).unwrap();
        app.poll_async_results();

        assert_eq!(app.route, Route::Login);
        assert!(app.session.is_none());
        assert!(!app.users_loading);
        assert!(!app.is_busy());
        assert!(app.login.error.is_some());
    }

    #[test]
    fn test_results_after_sign_out_are_dropped() {
        let mut app = test_app("stale");
        signed_in(&mut app);
        app.route_to_login(None);

        app.tx
            .send(UiMessage::AdminLoaded(AdminProfile {
                admin_uuid: "admin-uuid-1".to_string(),
                email: Some("op@library.ph".to_string()),
                first_name: None,
                middle_name: None,
                last_name: None,
            }))
            .unwrap();
        app.tx.send(UiMessage::UsersLoadFailed("401".to_string())).unwrap();
        app.tx.send(UiMessage::SessionExpired("late".to_string())).unwrap();
        let logged = app.log_messages.len();
        app.poll_async_results();

        assert!(app.admin.is_none());
        assert_eq!(app.route, Route::Login);
        assert!(app.login.error.is_none());
        assert_eq!(app.log_messages.len(), logged);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_switch_role_clears_form_and_summary() {
        let mut state = AddUserState::default();
        state.form.email = "ana@library.ph".to_string();
        state.form.password = "pw".to_string();

        state.switch_role(Role::Staff);
        assert_eq!(state.role, Role::Staff);
        assert_eq!(state.form, RegistrationForm::default());
        assert!(state.summary.is_none());
    }

    #[test]
    fn test_switch_to_same_role_keeps_form() {
        let mut state = AddUserState::default();
        state.form.email = "ana@library.ph".to_string();
        state.switch_role(Role::Admin);
        assert_eq!(state.form.email, "ana@library.ph");
    }
}
