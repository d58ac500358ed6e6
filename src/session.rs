use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{PublicUser, Role};
use crate::store::{KeyValueStore, CURRENT_USER_KEY};
use crate::users::UserStorage;
use crate::validators;

/// The logged-in user is a password-stripped record persisted under its own
/// key, so it survives process restarts. There is no expiry.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<PublicUser> {
        validators::validate_login(email, password)?;

        let user = UserStorage::new(self.store.clone())
            .find_by_email(email)?
            .ok_or(Error::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| Error::Backend(format!("failed to verify password: {e}")))?;
        if !valid {
            warn!(email, "login rejected");
            return Err(Error::InvalidCredentials);
        }

        let public = user.to_public();
        let json = serde_json::to_string_pretty(&public)
            .map_err(|e| Error::Backend(format!("failed to serialize session: {e}")))?;
        self.store.set(CURRENT_USER_KEY, &json)?;

        info!(email, "user logged in");
        Ok(public)
    }

    /// Idempotent; logging out twice is fine.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(CURRENT_USER_KEY)
    }

    pub fn current(&self) -> Result<Option<PublicUser>> {
        current_user(self.store.as_ref())
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.current()?.is_some())
    }

    pub fn is_admin(&self) -> Result<bool> {
        Ok(self
            .current()?
            .map(|user| user.role == Role::Admin)
            .unwrap_or(false))
    }
}

pub(crate) fn current_user(store: &dyn KeyValueStore) -> Result<Option<PublicUser>> {
    match store.get(CURRENT_USER_KEY)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| Error::CorruptData {
                key: CURRENT_USER_KEY.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Cart and order operations are only resolvable for a logged-in user.
pub(crate) fn require_user(store: &dyn KeyValueStore) -> Result<PublicUser> {
    current_user(store)?.ok_or(Error::NotLoggedIn)
}
