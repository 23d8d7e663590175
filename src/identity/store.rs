use std::sync::Arc;

use tracing::debug;

use super::account::{Account, IdentityError};
use super::repository::AccountRepository;
use crate::security;

/// Registration and credential checks over an injected repository.
#[derive(Clone)]
pub struct IdentityStore {
    repo: Arc<dyn AccountRepository>,
}

impl IdentityStore {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self { Self { repo } }

    pub fn repository(&self) -> &Arc<dyn AccountRepository> { &self.repo }

    /// Hash and store a new account. An existing email is left untouched.
    pub fn register(&self, email: &str, name: &str, password: &str) -> Result<(), IdentityError> {
        if self.repo.get(email).is_some() {
            return Err(IdentityError::AlreadyExists);
        }
        let password_hash = security::hash_password(password).map_err(|e| IdentityError::Hashing(e.to_string()))?;
        self.repo.put(Account { email: email.to_string(), display_name: name.to_string(), password_hash })?;
        debug!(target: "identity", email, "account registered");
        Ok(())
    }

    /// Returns the display name on success. Unknown email and wrong password
    /// are the same error.
    pub fn verify(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let Some(account) = self.repo.get(email) else { return Err(IdentityError::InvalidCredentials); };
        if security::verify_password(&account.password_hash, password) {
            Ok(account.display_name)
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }

    pub fn contains(&self, email: &str) -> bool { self.repo.get(email).is_some() }
}
