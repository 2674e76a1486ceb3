use http::HeaderMap;

use crate::password::{hash_password, verify_password};
use crate::service::AuthService;
use crate::session::SessionState;
use crate::userdb::{Account, AccountError, AccountSearchField};

use super::errors::{CONFLICT_EMAIL_REGISTERED, CoordinationError};

impl AuthService {
    /// Create a password account and log the caller in as it.
    #[tracing::instrument(skip(self, headers, password))]
    pub async fn register(
        &self,
        headers: &HeaderMap,
        email: &str,
        password: &str,
    ) -> Result<HeaderMap, CoordinationError> {
        let accounts = &self.inner.accounts;
        let session = self.inner.sessions.load(headers).await?;

        if accounts
            .find_one(AccountSearchField::Email(email.to_string()))
            .await?
            .is_some()
        {
            tracing::warn!("Registration rejected: email already registered");
            return Err(CoordinationError::Conflict(
                CONFLICT_EMAIL_REGISTERED.to_string(),
            ));
        }

        let password_hash = hash_password(password).await?;
        let account = match accounts
            .insert_one(Account::with_password(email, password_hash))
            .await
        {
            Ok(account) => account,
            Err(AccountError::Duplicate(_)) => {
                tracing::warn!("Registration lost a race on the email index");
                return Err(CoordinationError::Conflict(
                    CONFLICT_EMAIL_REGISTERED.to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(account_id = %account.id, "Registered password account");

        let state = SessionState::authenticated(&account.id, true, false);
        Ok(self.inner.sessions.authenticate(&session, state).await?)
    }

    /// Log in with email and password.
    ///
    /// Unknown email, OAuth-only account and wrong password all fail with
    /// [`CoordinationError::InvalidCredentials`] after the same amount of hashing work.
    #[tracing::instrument(skip(self, headers, password))]
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        email: &str,
        password: &str,
    ) -> Result<HeaderMap, CoordinationError> {
        let session = self.inner.sessions.load(headers).await?;
        let account = self
            .inner
            .accounts
            .find_one(AccountSearchField::Email(email.to_string()))
            .await?;

        let stored_hash = account.as_ref().and_then(|a| a.password_hash.as_deref());
        let valid = verify_password(password, stored_hash).await?;

        let Some(account) = account.filter(|_| valid) else {
            tracing::warn!("Rejected login attempt");
            return Err(CoordinationError::InvalidCredentials);
        };

        tracing::info!(account_id = %account.id, "Password login");

        let state = SessionState::authenticated(&account.id, true, account.has_oauth());
        Ok(self.inner.sessions.authenticate(&session, state).await?)
    }

    /// Replace the logged-in account's password.
    ///
    /// An account without a password (created through OAuth) sets its first one here
    /// and `old_password` is ignored.
    #[tracing::instrument(skip_all)]
    pub async fn change_password(
        &self,
        headers: &HeaderMap,
        old_password: &str,
        new_password: &str,
    ) -> Result<HeaderMap, CoordinationError> {
        let accounts = &self.inner.accounts;
        let session = self.inner.sessions.load(headers).await?;

        let Some(account_id) = session.account_id() else {
            return Err(CoordinationError::Unauthorized);
        };

        let Some(account) = accounts
            .find_one(AccountSearchField::Id(account_id.to_string()))
            .await?
        else {
            tracing::warn!("Password change for a session whose account is gone");
            return Err(CoordinationError::InvalidCredentials);
        };

        if let Some(stored_hash) = account.password_hash.as_deref() {
            if !verify_password(old_password, Some(stored_hash)).await? {
                tracing::warn!(account_id = %account.id, "Password change with wrong old password");
                return Err(CoordinationError::WrongPassword);
            }
        }

        let password_hash = hash_password(new_password).await?;
        if !accounts.update_password(&account.id, &password_hash).await? {
            return Err(AccountError::NotFound.into());
        }

        tracing::info!(account_id = %account.id, first = !account.has_password(), "Password changed");

        let state = SessionState::authenticated(&account.id, true, account.has_oauth());
        Ok(self.inner.sessions.save(&session, state).await?)
    }
}
