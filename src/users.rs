use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{PublicUser, Registration, Role, User};
use crate::store::{read_collection, write_collection, KeyValueStore, USERS_KEY};
use crate::validators;

// Administrator account seeded on first use.
const ADMIN_NAME: &str = "Administrator";
const ADMIN_EMAIL: &str = "admin@admin.com";
const ADMIN_PASSWORD: &str = "admin1234";

pub struct UserStorage {
    store: Arc<dyn KeyValueStore>,
}

impl UserStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Seeds the administrator account if the user collection has never
    /// been written. Calling this again is a no-op.
    pub fn ensure_admin(&self) -> Result<()> {
        if self.store.get(USERS_KEY)?.is_some() {
            return Ok(());
        }

        let hash = hash_password(ADMIN_PASSWORD)?;
        let admin = User::new(
            ADMIN_NAME.to_string(),
            ADMIN_EMAIL.to_string(),
            hash,
            Role::Admin,
        );
        write_collection(self.store.as_ref(), USERS_KEY, &[admin])?;
        info!("seeded administrator account");
        Ok(())
    }

    /// Validates the registration form, rejects duplicate emails and stores
    /// the new account with a hashed password. Nothing is written unless
    /// every check passes.
    pub fn register(&self, registration: Registration) -> Result<PublicUser> {
        validators::validate_registration(&registration)?;

        let mut users = self.list()?;
        if users
            .iter()
            .any(|u| u.email.to_lowercase() == registration.email.to_lowercase())
        {
            return Err(Error::validation("This email is already registered"));
        }

        let hash = hash_password(&registration.password)?;
        let user = User::new(registration.name, registration.email, hash, Role::User);
        let public = user.to_public();

        users.push(user);
        write_collection(self.store.as_ref(), USERS_KEY, &users)?;

        info!(email = %public.email, "registered new user");
        Ok(public)
    }

    pub fn list(&self) -> Result<Vec<User>> {
        read_collection(self.store.as_ref(), USERS_KEY)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.list()?.into_iter().find(|u| u.email == email))
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.list()?.into_iter().find(|u| u.id == id))
    }
}

pub(crate) fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| Error::Backend(format!("failed to hash password: {e}")))
}
