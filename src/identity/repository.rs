use std::collections::HashMap;

use parking_lot::RwLock;

use super::account::{Account, IdentityError};

/// Keyed account storage. `put` must refuse to replace an existing email.
pub trait AccountRepository: Send + Sync {
    fn get(&self, email: &str) -> Option<Account>;
    fn put(&self, account: Account) -> Result<(), IdentityError>;
}

/// Process-lifetime map; everything is gone on restart.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.accounts.read().len() }

    pub fn is_empty(&self) -> bool { self.accounts.read().is_empty() }
}

impl AccountRepository for InMemoryAccountRepository {
    fn get(&self, email: &str) -> Option<Account> {
        self.accounts.read().get(email).cloned()
    }

    fn put(&self, account: Account) -> Result<(), IdentityError> {
        // presence check and insert under one write guard
        let mut map = self.accounts.write();
        if map.contains_key(&account.email) {
            return Err(IdentityError::AlreadyExists);
        }
        map.insert(account.email.clone(), account);
        Ok(())
    }
}
