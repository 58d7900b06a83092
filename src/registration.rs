//! Admin/staff registration flow.
//!
//! Steps run strictly in order and stop at the first failure. Completed steps
//! are not undone: the anon key cannot delete auth identities, so a failure
//! after [`RegistrationStage::CreateIdentity`] leaves an identity without a
//! profile row. The error names the failed stage so the operator can finish
//! the job by hand.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::backend::{BackendClient, Session};
use crate::credentials;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{NewHistoryEntry, NewProfile, Role, generate_staff_id};
use crate::password;

/// Form state for the add-user screen.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Raw age input, parsed on submit.
    pub age: String,
    pub birthday: Option<NaiveDate>,
    pub address: String,
}

/// Validated registration request.
#[derive(Clone, PartialEq)]
pub struct Registration {
    pub role: Role,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub birthday: Option<NaiveDate>,
    pub address: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("role", &self.role)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Confirmation was typed and differs from the password.
    pub fn password_mismatch(&self) -> bool {
        !self.confirm_password.is_empty() && self.confirm_password != self.password
    }

    /// Check the form and build a request for `role`.
    pub fn validate(&self, role: Role) -> Result<Registration> {
        if self.password.is_empty() {
            return Err(AppError::validation("Password is required."));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required."));
        }
        if self.confirm_password != self.password {
            return Err(AppError::validation("Passwords do not match."));
        }

        let age = match self.age.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(age) if age >= 0 => Some(age),
                _ => return Err(AppError::validation("Age must be a whole number.")),
            },
        };

        Ok(Registration {
            role,
            email: email.to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            middle_name: self.middle_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            age,
            birthday: self.birthday,
            address: self.address.trim().to_string(),
        })
    }
}

/// Step of the registration flow, used to report where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    CurrentUser,
    AdminLookup,
    HashPassword,
    CreateIdentity,
    SaveCredentials,
    InsertProfile,
    InsertHistory,
}

impl std::fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RegistrationStage::CurrentUser => "checking the signed-in user",
            RegistrationStage::AdminLookup => "looking up your admin record",
            RegistrationStage::HashPassword => "hashing the password",
            RegistrationStage::CreateIdentity => "creating the login",
            RegistrationStage::SaveCredentials => "saving the credentials file",
            RegistrationStage::InsertProfile => "saving the profile",
            RegistrationStage::InsertHistory => "recording the history entry",
        };
        f.write_str(text)
    }
}

/// Registration failure with the stage it happened in.
#[derive(Error, Debug)]
#[error("Registration failed while {stage}: {source}")]
pub struct RegistrationError {
    pub stage: RegistrationStage,
    #[source]
    pub source: AppError,
}

trait StageExt<T> {
    fn at(self, stage: RegistrationStage) -> std::result::Result<T, RegistrationError>;
}

impl<T> StageExt<T> for Result<T> {
    fn at(self, stage: RegistrationStage) -> std::result::Result<T, RegistrationError> {
        self.map_err(|source| {
            tracing::error!(?stage, "Registration step failed: {}", source);
            RegistrationError { stage, source }
        })
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationSummary {
    pub role: Role,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub birthday: Option<NaiveDate>,
    pub address: String,
    pub staff_id: Option<i64>,
    pub registered_at: DateTime<FixedOffset>,
    pub credentials_path: PathBuf,
}

/// Runs registrations on behalf of the signed-in operator.
pub struct Registrar<'a> {
    client: &'a BackendClient,
    session: &'a Session,
    offset: FixedOffset,
    credentials_dir: &'a Path,
}

impl<'a> Registrar<'a> {
    pub fn new(
        client: &'a BackendClient,
        session: &'a Session,
        offset: FixedOffset,
        credentials_dir: &'a Path,
    ) -> Self {
        Self {
            client,
            session,
            offset,
            credentials_dir,
        }
    }

    /// Register a new admin or staff member.
    pub async fn register(&self, request: Registration) -> std::result::Result<RegistrationSummary, RegistrationError> {
        use RegistrationStage::*;

        let token = self.session.access_token.as_str();
        tracing::info!(role = %request.role, email = %request.email, "Registering user");

        let operator = self.client.get_user(token).await.at(CurrentUser)?;
        let operator_email = operator.require_email().at(CurrentUser)?;

        let acting_admin = db::admin::find_by_email(self.client, token, operator_email)
            .await
            .at(AdminLookup)?;

        let hashed = password::hash_password(&request.password).at(HashPassword)?;

        self.client
            .sign_up(&request.email, &request.password)
            .await
            .at(CreateIdentity)?;

        let credentials_path =
            credentials::write_credentials(self.credentials_dir, &request.email, &request.password)
                .at(SaveCredentials)?;

        let now = Utc::now().with_timezone(&self.offset);
        let staff_id = match request.role {
            Role::Admin => None,
            Role::Staff => Some(generate_staff_id(now.year(), &mut OsRng)),
        };

        let profile = NewProfile {
            email: request.email.clone(),
            password: hashed,
            first_name: request.first_name.clone(),
            middle_name: request.middle_name.clone(),
            last_name: request.last_name.clone(),
            age: request.age,
            birthday: request.birthday,
            address: request.address.clone(),
            staff_id,
        };
        let inserted = match request.role {
            Role::Admin => db::admin::insert(self.client, token, &profile).await,
            Role::Staff => db::staff::insert(self.client, token, &profile).await,
        };
        inserted.at(InsertProfile)?;

        let entry = NewHistoryEntry::new(&acting_admin.admin_uuid, &request.first_name, request.role, now);
        db::history::insert(self.client, token, &entry).await.at(InsertHistory)?;

        tracing::info!(role = %request.role, email = %request.email, ?staff_id, "Registration complete");

        Ok(RegistrationSummary {
            role: request.role,
            email: request.email,
            first_name: request.first_name,
            middle_name: request.middle_name,
            last_name: request.last_name,
            age: request.age,
            birthday: request.birthday,
            address: request.address,
            staff_id,
            registered_at: now,
            credentials_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path as UrlPath, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use crate::backend::AuthUser;
    use crate::config::BackendConfig;

    /// What the local backend saw.
    #[derive(Clone, Default)]
    struct Recorded {
        fail_sign_up: bool,
        sign_ups: Arc<Mutex<Vec<Value>>>,
        inserts: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl Recorded {
        fn inserts(&self) -> Vec<(String, Value)> {
            self.inserts.lock().unwrap().clone()
        }
    }

    async fn current_user() -> Json<Value> {
        Json(json!({ "id": "op-1", "email": "op@library.ph" }))
    }

    async fn sign_up(State(rec): State<Recorded>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        rec.sign_ups.lock().unwrap().push(body.clone());
        if rec.fail_sign_up {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "code": 422, "msg": "User already registered" })),
            );
        }
        (StatusCode::OK, Json(json!({ "id": "new-1", "email": body["email"] })))
    }

    async fn select_one(UrlPath(table): UrlPath<String>) -> (StatusCode, Json<Value>) {
        if table == "admin" {
            let row = json!({ "admin_uuid": "admin-uuid-1", "email": "op@library.ph", "first_name": "Op" });
            return (StatusCode::OK, Json(row));
        }
        (StatusCode::NOT_ACCEPTABLE, Json(json!({ "message": "no rows" })))
    }

    async fn insert_row(
        State(rec): State<Recorded>,
        UrlPath(table): UrlPath<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        rec.inserts.lock().unwrap().push((table, body.clone()));
        (StatusCode::CREATED, Json(json!([body])))
    }

    /// Auth and REST endpoints on an ephemeral local port.
    struct LocalBackend {
        client: BackendClient,
        recorded: Recorded,
        handle: tokio::task::JoinHandle<()>,
    }

    impl LocalBackend {
        async fn spawn(fail_sign_up: bool) -> Self {
            let recorded = Recorded {
                fail_sign_up,
                ..Recorded::default()
            };
            let app = Router::new()
                .route("/auth/v1/user", get(current_user))
                .route("/auth/v1/signup", post(sign_up))
                .route("/rest/v1/{table}", get(select_one).post(insert_row))
                .with_state(recorded.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let handle = tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            let client = BackendClient::new(&BackendConfig {
                url: format!("http://{addr}"),
                anon_key: "anon-key".to_string(),
                timeout_secs: 5,
            })
            .unwrap();

            Self {
                client,
                recorded,
                handle,
            }
        }
    }

    impl Drop for LocalBackend {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    fn operator_session() -> Session {
        Session {
            access_token: "operator-token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            user: AuthUser {
                id: "op-1".to_string(),
                email: Some("op@library.ph".to_string()),
            },
        }
    }

    fn credentials_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lla-register-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn filled_form() -> RegistrationForm {
        RegistrationForm {
            email: " ana@library.ph ".to_string(),
            password: "pw123".to_string(),
            confirm_password: "pw123".to_string(),
            first_name: "Ana".to_string(),
            middle_name: String::new(),
            last_name: "Cruz".to_string(),
            age: "31".to_string(),
            birthday: NaiveDate::from_ymd_opt(1994, 3, 2),
            address: "Quezon City".to_string(),
        }
    }

    #[test]
    fn test_aborts_without_password() {
        let form = RegistrationForm {
            password: String::new(),
            confirm_password: String::new(),
            ..filled_form()
        };
        let err = form.validate(Role::Admin).unwrap_err();
        assert_eq!(err.to_string(), "Password is required.");
    }

    #[test]
    fn test_password_checked_before_email() {
        let form = RegistrationForm::default();
        assert_eq!(
            form.validate(Role::Staff).unwrap_err().to_string(),
            "Password is required."
        );
    }

    #[test]
    fn test_rejects_mismatched_confirmation() {
        let form = RegistrationForm {
            confirm_password: "pw124".to_string(),
            ..filled_form()
        };
        assert!(form.password_mismatch());
        assert!(form.validate(Role::Admin).is_err());
    }

    #[test]
    fn test_mismatch_not_flagged_while_confirmation_empty() {
        let form = RegistrationForm {
            confirm_password: String::new(),
            ..filled_form()
        };
        assert!(!form.password_mismatch());
    }

    #[test]
    fn test_rejects_bad_email_and_age() {
        let form = RegistrationForm {
            email: "not-an-email".to_string(),
            ..filled_form()
        };
        assert!(form.validate(Role::Admin).is_err());

        let form = RegistrationForm {
            age: "thirty".to_string(),
            ..filled_form()
        };
        assert!(form.validate(Role::Admin).is_err());

        let form = RegistrationForm {
            age: "-1".to_string(),
            ..filled_form()
        };
        assert!(form.validate(Role::Admin).is_err());
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let request = filled_form().validate(Role::Staff).unwrap();
        assert_eq!(request.role, Role::Staff);
        assert_eq!(request.email, "ana@library.ph");
        assert_eq!(request.age, Some(31));

        let no_age = RegistrationForm {
            age: "  ".to_string(),
            ..filled_form()
        };
        assert_eq!(no_age.validate(Role::Admin).unwrap().age, None);
    }

    #[test]
    fn test_debug_hides_password() {
        let request = filled_form().validate(Role::Admin).unwrap();
        assert!(!format!("{request:?}").contains("pw123"));
    }

    #[test]
    fn test_reset() {
        let mut form = filled_form();
        form.reset();
        assert_eq!(form, RegistrationForm::default());
    }

    #[test]
    fn test_error_names_stage() {
        let err = RegistrationError {
            stage: RegistrationStage::CreateIdentity,
            source: AppError::Api {
                status: 422,
                message: "User already registered".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Registration failed while creating the login: Backend error (422): User already registered"
        );
    }

    #[tokio::test]
    async fn test_register_staff_writes_profile_then_history() {
        let backend = LocalBackend::spawn(false).await;
        let session = operator_session();
        let dir = credentials_dir("staff");
        let registrar = Registrar::new(&backend.client, &session, manila(), &dir);

        let request = filled_form().validate(Role::Staff).unwrap();
        let summary = registrar.register(request).await.unwrap();

        let staff_id = summary.staff_id.unwrap();
        assert_eq!(staff_id / 1_000_000, i64::from(summary.registered_at.year()));
        assert_eq!(
            std::fs::read_to_string(&summary.credentials_path).unwrap(),
            "Email: ana@library.ph\nPassword: pw123"
        );

        let sign_ups = backend.recorded.sign_ups.lock().unwrap().clone();
        assert_eq!(sign_ups.len(), 1);
        assert_eq!(sign_ups[0]["password"], "pw123");

        let inserts = backend.recorded.inserts();
        let tables: Vec<&str> = inserts.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tables, ["staff", "admin_history"]);

        let profile = &inserts[0].1;
        assert_eq!(profile["email"], "ana@library.ph");
        assert_eq!(profile["staff_id"], staff_id);
        assert!(profile["password"].as_str().unwrap().starts_with("$argon2"));

        let history = &inserts[1].1;
        assert_eq!(history["admin_uuid"], "admin-uuid-1");
        assert_eq!(history["first_name"], "Ana");
        assert_eq!(history["role"], "Staff");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_register_admin_has_no_staff_id() {
        let backend = LocalBackend::spawn(false).await;
        let session = operator_session();
        let dir = credentials_dir("admin");
        let registrar = Registrar::new(&backend.client, &session, manila(), &dir);

        let request = filled_form().validate(Role::Admin).unwrap();
        let summary = registrar.register(request).await.unwrap();
        assert_eq!(summary.staff_id, None);

        let inserts = backend.recorded.inserts();
        assert_eq!(inserts[0].0, "admin");
        assert!(inserts[0].1.get("staff_id").is_none());
        assert_eq!(inserts[1].1["role"], "Admin");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_failed_sign_up_stops_before_any_row() {
        let backend = LocalBackend::spawn(true).await;
        let session = operator_session();
        let dir = credentials_dir("rejected");
        let registrar = Registrar::new(&backend.client, &session, manila(), &dir);

        let request = filled_form().validate(Role::Staff).unwrap();
        let err = registrar.register(request).await.unwrap_err();

        assert_eq!(err.stage, RegistrationStage::CreateIdentity);
        assert!(err.to_string().contains("User already registered"));
        assert!(backend.recorded.inserts().is_empty());
        assert!(!dir.join("credentials.txt").exists());
    }
}
