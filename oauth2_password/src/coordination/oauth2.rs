use http::HeaderMap;

use crate::oauth2::{CallbackQuery, append_handoff_params};
use crate::service::AuthService;
use crate::session::{Session, SessionState};
use crate::userdb::{Account, AccountError, AccountSearchField, OAuthBinding, Profile};

use super::errors::{
    CONFLICT_ALREADY_LINKED, CONFLICT_EMAIL_HAS_ACCOUNT, CoordinationError, NOT_LINKED,
    PASSWORD_REQUIRED,
};

/// How a redeemed handoff code was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Logged in as the account already bound to the identity.
    LoggedIn,
    /// Bound the identity to the caller's account.
    Linked,
    /// Created a new account for the identity and logged in.
    Registered,
}

impl LinkOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LoggedIn | Self::Registered => "Successfully logged in!",
            Self::Linked => "Successfully linked!",
        }
    }
}

impl AuthService {
    /// Provider consent URL for a browser that should come back to `return_target`.
    pub fn oauth2_authorization_url(&self, return_target: &str) -> Result<String, CoordinationError> {
        Ok(self.inner.broker.authorization_url(return_target)?)
    }

    /// Where to send the browser when the callback fails.
    pub fn oauth2_failure_redirect(&self) -> &str {
        self.inner.broker.failure_redirect()
    }

    /// Finish the provider round trip and return the frontend URL carrying the handoff code.
    #[tracing::instrument(skip_all)]
    pub async fn handle_oauth2_callback(
        &self,
        query: &CallbackQuery,
    ) -> Result<String, CoordinationError> {
        let return_target = self.inner.broker.verify_state(&query.state)?;
        let (external, access_token) = self.inner.broker.fetch_identity(&query.code).await?;
        let code = self.inner.handoff.issue(external, access_token).await?;
        Ok(append_handoff_params(return_target, &code))
    }

    /// Redeem a handoff code against the caller's session.
    ///
    /// Checks run in a fixed order: an identity that is already bound logs in (or
    /// conflicts if the caller is logged in), then a logged-in caller links, then an
    /// email collision conflicts, and otherwise a new account is created.
    #[tracing::instrument(skip_all)]
    pub async fn resolve_oauth_handoff(
        &self,
        headers: &HeaderMap,
        code: &str,
    ) -> Result<(HeaderMap, LinkOutcome), CoordinationError> {
        let accounts = &self.inner.accounts;

        let Some(record) = self.inner.handoff.redeem(code).await? else {
            tracing::warn!("Handoff code unknown, expired or already used");
            return Err(CoordinationError::HandoffNotFound);
        };

        let mut session = self.inner.sessions.load(headers).await?;
        let stale = match session.account_id() {
            Some(account_id) => accounts
                .find_one(AccountSearchField::Id(account_id.to_string()))
                .await?
                .is_none(),
            None => false,
        };
        if stale {
            tracing::warn!("Session refers to a missing account, treating as anonymous");
            session.state = SessionState::default();
        }

        let external = record.external;
        let binding = OAuthBinding {
            provider_user_id: external.provider_user_id.clone(),
            access_token: record.access_token,
        };
        let profile = Profile {
            name: external.name,
            picture: external.picture,
        };

        if let Some(bound) = accounts
            .find_one(AccountSearchField::OAuthProviderId(
                external.provider_user_id,
            ))
            .await?
        {
            if session.state().is_authenticated() {
                tracing::warn!(account_id = %bound.id, "Identity is already bound to an account");
                return Err(CoordinationError::Conflict(
                    CONFLICT_ALREADY_LINKED.to_string(),
                ));
            }

            tracing::info!(account_id = %bound.id, "OAuth2 login");
            let state = SessionState::authenticated(&bound.id, bound.has_password(), true);
            let set_cookie = self.inner.sessions.authenticate(&session, state).await?;
            return Ok((set_cookie, LinkOutcome::LoggedIn));
        }

        if let Some(account_id) = session.account_id().map(str::to_owned) {
            let set_cookie = self
                .link_current_account(&session, &account_id, &binding, &profile)
                .await?;
            return Ok((set_cookie, LinkOutcome::Linked));
        }

        if accounts
            .find_one(AccountSearchField::Email(external.email.clone()))
            .await?
            .is_some()
        {
            tracing::warn!("OAuth2 email already belongs to an account");
            return Err(CoordinationError::Conflict(
                CONFLICT_EMAIL_HAS_ACCOUNT.to_string(),
            ));
        }

        let account = match accounts
            .insert_one(Account::with_oauth(&external.email, binding, profile))
            .await
        {
            Ok(account) => account,
            Err(AccountError::Duplicate(field)) => {
                tracing::warn!(field = %field, "OAuth2 registration lost a race");
                let msg = if field == "email" {
                    CONFLICT_EMAIL_HAS_ACCOUNT
                } else {
                    CONFLICT_ALREADY_LINKED
                };
                return Err(CoordinationError::Conflict(msg.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(account_id = %account.id, "Registered OAuth2 account");

        let state = SessionState::authenticated(&account.id, false, true);
        let set_cookie = self.inner.sessions.authenticate(&session, state).await?;
        Ok((set_cookie, LinkOutcome::Registered))
    }

    async fn link_current_account(
        &self,
        session: &Session,
        account_id: &str,
        binding: &OAuthBinding,
        profile: &Profile,
    ) -> Result<HeaderMap, CoordinationError> {
        match self
            .inner
            .accounts
            .set_oauth_binding(account_id, binding, profile)
            .await
        {
            Ok(true) => {}
            Ok(false) => return Err(AccountError::NotFound.into()),
            Err(AccountError::Duplicate(_)) => {
                tracing::warn!("Identity was bound concurrently to another account");
                return Err(CoordinationError::Conflict(
                    CONFLICT_ALREADY_LINKED.to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(account_id = %account_id, "Linked OAuth2 identity");

        let state = SessionState {
            has_oauth: true,
            ..session.state().clone()
        };
        Ok(self.inner.sessions.save(session, state).await?)
    }

    /// Remove the Google binding from the caller's account.
    ///
    /// Refused while the account has no password, since the binding is then its only
    /// credential.
    #[tracing::instrument(skip_all)]
    pub async fn unlink_oauth(&self, headers: &HeaderMap) -> Result<HeaderMap, CoordinationError> {
        let accounts = &self.inner.accounts;
        let session = self.inner.sessions.load(headers).await?;

        let Some(account_id) = session.account_id() else {
            return Err(CoordinationError::Unauthorized);
        };
        if !session.state().has_oauth {
            return Err(CoordinationError::BadRequest(NOT_LINKED.to_string()));
        }

        let Some(account) = accounts
            .find_one(AccountSearchField::Id(account_id.to_string()))
            .await?
        else {
            return Err(CoordinationError::Unauthorized);
        };

        if !account.has_password() || !accounts.clear_oauth_binding(&account.id).await? {
            tracing::warn!(account_id = %account.id, "Refused to unlink the only credential");
            return Err(CoordinationError::BadRequest(PASSWORD_REQUIRED.to_string()));
        }

        tracing::info!(account_id = %account.id, "Unlinked OAuth2 identity");

        let state = SessionState::authenticated(&account.id, true, false);
        Ok(self.inner.sessions.save(&session, state).await?)
    }
}
