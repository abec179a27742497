use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenPair;
use auth::TokenPurpose;

use crate::account::errors::AccountError;
use crate::account::errors::RepositoryError;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Credentials;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::RegisterCommand;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

/// Domain service implementation for account operations.
///
/// Implements login (credential verification), refresh and registration on top of
/// an injected repository and the shared `Authenticator`. Argon2 work is moved to
/// the blocking pool; storage calls are bounded by `lookup_timeout`.
pub struct AccountService<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
    lookup_timeout: Duration,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            lookup_timeout: Self::DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Bound every storage call by `timeout`.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    async fn with_deadline<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        tokio::time::timeout(self.lookup_timeout, operation)
            .await
            .unwrap_or(Err(RepositoryError::Timeout(self.lookup_timeout)))
    }

    async fn run_blocking<T, F>(&self, task: F) -> Result<T, AccountError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || task(&authenticator))
            .await
            .map_err(|e| AccountError::Internal(format!("Blocking task failed: {}", e)))
    }

    fn require_usable(account: Option<Account>) -> Option<Account> {
        account.filter(Account::is_usable)
    }
}

#[async_trait]
impl<R> AccountServicePort for AccountService<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        let RegisterCommand {
            user_name,
            password,
            profile,
        } = command;

        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(&password))
            .await?
            .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))?;

        let new_account = NewAccount {
            user_name,
            password_hash,
            profile,
        };

        match self.with_deadline(self.repository.register(new_account)).await {
            Ok(account) => {
                tracing::info!(account_id = %account.id, "Account registered");
                Ok(account)
            }
            Err(RepositoryError::AlreadyExists(user_name)) => {
                tracing::debug!(user_name = %user_name, "Registration rejected: user existed");
                Err(AccountError::InvalidRequest("user existed".to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration failed");
                Err(AccountError::Internal(format!("Failed to store account: {}", e)))
            }
        }
    }

    async fn authenticate(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<TokenPair, AccountError> {
        let credentials = Credentials::new(user_name, password)?;

        let lookup = self
            .with_deadline(
                self.repository
                    .find_active_by_user_name(&credentials.user_name),
            )
            .await;

        let account = match lookup.map(Self::require_usable) {
            Ok(Some(account)) => account,
            Ok(None) => {
                tracing::warn!(user_name = %credentials.user_name, "Login rejected: no active account");
                return Err(AccountError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => {
                tracing::error!(
                    user_name = %credentials.user_name,
                    error = %e,
                    "Login rejected: account lookup failed"
                );
                return Err(AccountError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let password = credentials.password;
        let stored_hash = account.password_hash.clone();
        let verification = self
            .run_blocking(move |authenticator| {
                authenticator.verify_password(&password, &stored_hash)
            })
            .await?;

        match verification {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(account_id = %account.id, "Login rejected: password mismatch");
                return Err(AccountError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    "Login rejected: stored password hash unusable"
                );
                return Err(AccountError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        }

        let tokens = self
            .authenticator
            .issue_token_pair(account.id)
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "Token generation failed");
                AccountError::Internal(format!("Token generation failed: {}", e))
            })?;

        tracing::info!(account_id = %account.id, "Login succeeded");
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AccountError> {
        if refresh_token.trim().is_empty() {
            return Err(AccountError::InvalidRequest(
                "Refresh token is required".to_string(),
            ));
        }

        let claims = self
            .authenticator
            .validate_token(refresh_token, TokenPurpose::Refresh)
            .map_err(|e| {
                tracing::warn!(error = %e, "Refresh rejected: token validation failed");
                AccountError::Unauthorized(INVALID_REFRESH_TOKEN.to_string())
            })?;

        let account_id = claims.parse_subject::<AccountId>().map_err(|e| {
            tracing::warn!(error = %e, "Refresh rejected: unusable subject");
            AccountError::Unauthorized(INVALID_REFRESH_TOKEN.to_string())
        })?;

        let lookup = self
            .with_deadline(self.repository.find_active_by_id(&account_id))
            .await;

        let account = match lookup.map(Self::require_usable) {
            Ok(Some(account)) => account,
            Ok(None) => {
                tracing::warn!(account_id = %account_id, "Refresh rejected: account no longer active");
                return Err(AccountError::Unauthorized(
                    INVALID_REFRESH_TOKEN.to_string(),
                ));
            }
            Err(e) => {
                tracing::error!(account_id = %account_id, error = %e, "Account lookup failed");
                return Err(AccountError::Internal(format!(
                    "Account lookup failed: {}",
                    e
                )));
            }
        };

        let access_token = self
            .authenticator
            .issue_access_token(account.id)
            .map_err(|e| {
                tracing::error!(account_id = %account.id, error = %e, "Token generation failed");
                AccountError::Internal(format!("Token generation failed: {}", e))
            })?;

        tracing::debug!(account_id = %account.id, "Access token refreshed");
        Ok(access_token)
    }
}
