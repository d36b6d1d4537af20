use rusqlite::Result as SqlResult;

use crate::common::{SessionSummary, UserProfile};

use super::profile_db::{
    KEY_AUTH_TOKEN, KEY_THEME, KEY_USER_EMAIL, KEY_USER_NAME, ProfileDatabase,
};

/// Authentication state as the client knows it. The in-memory copy is the
/// single source of truth; the profile database mirrors it across restarts.
/// Invariant: `is_authenticated() == token.is_some()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Owned, lifecycle-scoped session store: auth state plus the last fetched
/// session list. Lives inside the backend task; the UI only sees events.
pub struct SessionStore {
    db: ProfileDatabase,
    auth: AuthState,
    sessions: Vec<SessionSummary>,
}

impl SessionStore {
    /// Restore auth state from durable storage.
    pub fn open(db: ProfileDatabase) -> SqlResult<Self> {
        let token = db.get(KEY_AUTH_TOKEN)?;
        let user = match (db.get(KEY_USER_NAME)?, db.get(KEY_USER_EMAIL)?) {
            (Some(username), Some(email)) => Some(UserProfile { username, email }),
            _ => None,
        };

        Ok(Self {
            db,
            auth: AuthState { token, user },
            sessions: Vec::new(),
        })
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.token.as_deref()
    }

    /// The backend only returns a token on login, so the display name is
    /// derived from the email's local part. Placeholder until the backend
    /// supplies a real display name.
    fn derive_username(email: &str) -> String {
        email.split('@').next().unwrap_or(email).to_string()
    }

    /// Persist a successful login and update the in-memory mirror.
    pub fn apply_login(&mut self, token: String, email: &str) -> SqlResult<UserProfile> {
        let user = UserProfile {
            username: Self::derive_username(email),
            email: email.to_string(),
        };

        self.db.set(KEY_AUTH_TOKEN, &token)?;
        self.db.set(KEY_USER_NAME, &user.username)?;
        self.db.set(KEY_USER_EMAIL, &user.email)?;

        self.auth = AuthState {
            token: Some(token),
            user: Some(user.clone()),
        };
        Ok(user)
    }

    /// Clear persisted token/user fields and the cached session list.
    pub fn clear(&mut self) -> SqlResult<()> {
        self.db.remove(KEY_AUTH_TOKEN)?;
        self.db.remove(KEY_USER_NAME)?;
        self.db.remove(KEY_USER_EMAIL)?;

        self.auth = AuthState::default();
        self.sessions.clear();
        Ok(())
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn cache_sessions(&mut self, sessions: Vec<SessionSummary>) {
        self.sessions = sessions;
    }

    pub fn theme(&self) -> SqlResult<Option<String>> {
        self.db.get(KEY_THEME)
    }

    pub fn set_theme(&self, name: &str) -> SqlResult<()> {
        self.db.set(KEY_THEME, name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn store() -> SessionStore {
        SessionStore::open(ProfileDatabase::in_memory().unwrap()).unwrap()
    }

    #[test]
    fn fresh_store_is_unauthenticated_with_empty_list() {
        let store = store();
        assert!(!store.auth().is_authenticated());
        assert_eq!(store.token(), None);
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn login_persists_and_sets_authenticated() {
        let mut store = store();
        let user = store
            .apply_login("tok-abc".to_string(), "alice@example.com")
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(store.auth().is_authenticated());
        assert_eq!(store.token(), Some("tok-abc"));
    }

    #[test]
    fn login_survives_reopen() {
        let db = ProfileDatabase::in_memory().unwrap();
        db.set(KEY_AUTH_TOKEN, "tok-abc").unwrap();
        db.set(KEY_USER_NAME, "alice").unwrap();
        db.set(KEY_USER_EMAIL, "alice@example.com").unwrap();

        let store = SessionStore::open(db).unwrap();
        assert!(store.auth().is_authenticated());
        assert_eq!(
            store.auth().user,
            Some(UserProfile {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            })
        );
    }

    #[test]
    fn logout_clears_everything() {
        let mut store = store();
        store
            .apply_login("tok-abc".to_string(), "alice@example.com")
            .unwrap();
        store.cache_sessions(vec![SessionSummary {
            id: "s1".to_string(),
            label: "First chat".to_string(),
            created_at: Utc::now(),
        }]);

        store.clear().unwrap();
        assert!(!store.auth().is_authenticated());
        assert_eq!(store.auth().user, None);
        assert!(store.sessions().is_empty());
    }

    #[test]
    fn username_falls_back_to_full_string_without_at_sign() {
        assert_eq!(SessionStore::derive_username("bob"), "bob");
        assert_eq!(SessionStore::derive_username("bob@host"), "bob");
    }

    #[test]
    fn theme_round_trips() {
        let store = store();
        assert_eq!(store.theme().unwrap(), None);
        store.set_theme("dark").unwrap();
        assert_eq!(store.theme().unwrap(), Some("dark".to_string()));
    }
}
