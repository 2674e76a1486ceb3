use std::sync::Arc;

use crate::storage::DataStore;
use crate::userdb::{
    errors::AccountError,
    types::{Account, AccountSearchField, OAuthBinding, Profile},
};

use super::postgres::*;
use super::sqlite::*;

/// Collection-style access to the accounts table.
#[derive(Clone)]
pub(crate) struct AccountStore {
    data_store: Arc<dyn DataStore>,
    table: String,
}

impl AccountStore {
    pub(crate) fn new(data_store: Arc<dyn DataStore>, table_prefix: &str) -> Self {
        Self {
            data_store,
            table: format!("{table_prefix}accounts"),
        }
    }

    /// Create the accounts table and its unique indexes if missing.
    pub(crate) async fn init(&self) -> Result<(), AccountError> {
        let store = &self.data_store;

        if let Some(pool) = store.as_sqlite() {
            create_tables_sqlite(pool, &self.table).await
        } else if let Some(pool) = store.as_postgres() {
            create_tables_postgres(pool, &self.table).await
        } else {
            Err(AccountError::Storage("Unsupported database type".to_string()))
        }
    }

    #[tracing::instrument(skip(self), fields(account_field = %field))]
    pub(crate) async fn find_one(
        &self,
        field: AccountSearchField,
    ) -> Result<Option<Account>, AccountError> {
        let store = &self.data_store;

        let result = if let Some(pool) = store.as_sqlite() {
            find_one_sqlite(pool, &self.table, &field).await
        } else if let Some(pool) = store.as_postgres() {
            find_one_postgres(pool, &self.table, &field).await
        } else {
            Err(AccountError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(found) => tracing::debug!(found = found.is_some(), "Account lookup completed"),
            Err(e) => tracing::error!(error = %e, "Account lookup failed"),
        }

        result
    }

    /// Insert a new account. Fails with [`AccountError::Duplicate`] if the email or
    /// provider identity is already taken.
    #[tracing::instrument(skip(self, account), fields(account_id = %account.id))]
    pub(crate) async fn insert_one(&self, account: Account) -> Result<Account, AccountError> {
        let store = &self.data_store;

        if let Some(pool) = store.as_sqlite() {
            insert_one_sqlite(pool, &self.table, &account).await?;
        } else if let Some(pool) = store.as_postgres() {
            insert_one_postgres(pool, &self.table, &account).await?;
        } else {
            return Err(AccountError::Storage("Unsupported database type".to_string()));
        }

        tracing::info!(has_oauth = account.has_oauth(), "Account created");
        Ok(account)
    }

    /// Returns false if no account has this id.
    #[tracing::instrument(skip(self, password_hash))]
    pub(crate) async fn update_password(
        &self,
        id: &str,
        password_hash: &str,
    ) -> Result<bool, AccountError> {
        let store = &self.data_store;

        if let Some(pool) = store.as_sqlite() {
            update_password_sqlite(pool, &self.table, id, password_hash).await
        } else if let Some(pool) = store.as_postgres() {
            update_password_postgres(pool, &self.table, id, password_hash).await
        } else {
            Err(AccountError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Bind an external identity and store its profile. Returns false if no account has
    /// this id, and [`AccountError::Duplicate`] if the identity is bound elsewhere.
    #[tracing::instrument(skip(self, binding, profile), fields(provider_user_id = %binding.provider_user_id))]
    pub(crate) async fn set_oauth_binding(
        &self,
        id: &str,
        binding: &OAuthBinding,
        profile: &Profile,
    ) -> Result<bool, AccountError> {
        let store = &self.data_store;

        if let Some(pool) = store.as_sqlite() {
            set_oauth_binding_sqlite(pool, &self.table, id, binding, profile).await
        } else if let Some(pool) = store.as_postgres() {
            set_oauth_binding_postgres(pool, &self.table, id, binding, profile).await
        } else {
            Err(AccountError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Remove the external identity, but only from an account that has a password.
    /// The profile is kept. Returns false when nothing was changed.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn clear_oauth_binding(&self, id: &str) -> Result<bool, AccountError> {
        let store = &self.data_store;

        if let Some(pool) = store.as_sqlite() {
            clear_oauth_binding_sqlite(pool, &self.table, id).await
        } else if let Some(pool) = store.as_postgres() {
            clear_oauth_binding_postgres(pool, &self.table, id).await
        } else {
            Err(AccountError::Storage("Unsupported database type".to_string()))
        }
    }
}
