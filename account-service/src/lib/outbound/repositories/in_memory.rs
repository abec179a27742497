use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::errors::RepositoryError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::UserName;
use crate::domain::account::ports::AccountRepository;

#[derive(Default)]
struct Store {
    next_id: i64,
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<AccountId, AccountProfile>,
}

/// Process-local account store for tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    store: Mutex<Store>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::Database("account store poisoned".to_string()))
    }

    /// Mark an account inactive. Returns false when the id is unknown.
    pub fn deactivate(&self, id: &AccountId) -> Result<bool, RepositoryError> {
        let mut store = self.lock()?;
        Ok(match store.accounts.get_mut(id) {
            Some(account) => {
                account.is_active = false;
                account.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    pub fn profile(&self, id: &AccountId) -> Result<Option<AccountProfile>, RepositoryError> {
        Ok(self.lock()?.profiles.get(id).cloned())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_active_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .lock()?
            .accounts
            .values()
            .find(|a| a.user_name == *user_name && a.is_usable())
            .cloned())
    }

    async fn find_active_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .lock()?
            .accounts
            .get(id)
            .filter(|a| a.is_usable())
            .cloned())
    }

    async fn register(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut guard = self.lock()?;
        let store = &mut *guard;
        let now = Utc::now();

        let existing = store
            .accounts
            .values_mut()
            .find(|a| a.user_name == account.user_name);

        let stored = match existing {
            Some(found) if found.is_usable() => {
                return Err(RepositoryError::AlreadyExists(
                    account.user_name.to_string(),
                ));
            }
            Some(found) => {
                found.password_hash = account.password_hash;
                found.is_active = true;
                found.is_deleted = false;
                found.updated_at = now;
                found.clone()
            }
            None => {
                store.next_id += 1;
                let created = Account {
                    id: AccountId(store.next_id),
                    user_name: account.user_name,
                    password_hash: account.password_hash,
                    is_active: true,
                    is_deleted: false,
                    created_at: now,
                    updated_at: now,
                };
                store.accounts.insert(created.id, created.clone());
                created
            }
        };

        if !account.profile.is_empty() {
            store.profiles.insert(stored.id, account.profile);
        }

        Ok(stored)
    }
}
