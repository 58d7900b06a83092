//! Operator session and its on-disk store.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;
use super::client::BackendClient;
use crate::error::Result;

/// Tokens are treated as expired this long before their real expiry.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Signed-in operator session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Whether the access token must be refreshed before use.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Return a usable session, refreshing it first if it has expired.
///
/// The flag is `true` when a new session was issued and should be stored.
pub async fn ensure_fresh(client: &BackendClient, session: Session) -> Result<(Session, bool)> {
    if !session.is_expired() {
        return Ok((session, false));
    }
    let refreshed = client.refresh_session(&session.refresh_token).await?;
    tracing::info!(expires_at = %refreshed.expires_at, "Session refreshed");
    Ok((refreshed, true))
}

/// JSON file holding the last session, so restarts stay signed in.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside the given data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing or unreadable file means none.
    pub fn load(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring corrupt session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Persist the session, readable by the owner only.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        crate::credentials::write_private(&self.path, content.as_bytes())?;
        Ok(())
    }

    /// Forget the stored session.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            user: AuthUser {
                id: "u-1".to_string(),
                email: Some("ana@library.ph".to_string()),
            },
        }
    }

    #[test]
    fn test_expiry_with_leeway() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        assert!(!session(now + Duration::minutes(10)).is_expired_at(now));
        assert!(session(now + Duration::seconds(30)).is_expired_at(now));
        assert!(session(now - Duration::minutes(1)).is_expired_at(now));
    }

    #[test]
    fn test_debug_hides_tokens() {
        let s = session(Utc::now());
        let printed = format!("{s:?}");
        assert!(!printed.contains("access"));
        assert!(!printed.contains("refresh"));
        assert!(printed.contains("ana@library.ph"));
    }

    #[test]
    fn test_store_round_trip_and_clear() {
        let dir = std::env::temp_dir().join(format!("lla-session-test-{}", std::process::id()));
        let store = SessionStore::in_dir(&dir);
        assert!(store.load().is_none());

        let original = session(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        store.save(&original).unwrap();
        assert_eq!(store.load(), Some(original));

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = std::env::temp_dir().join(format!("lla-session-corrupt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = SessionStore::in_dir(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
