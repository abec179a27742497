use async_trait::async_trait;
use auth::TokenPair;

use crate::account::errors::AccountError;
use crate::account::errors::RepositoryError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::UserName;

/// Port for account domain service operations.
///
/// Every error is one of `InvalidRequest`, `Unauthorized` or `Internal`.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register an account, or reactivate a deactivated one with a new password.
    ///
    /// # Arguments
    /// * `command` - Validated command containing user name, password and profile
    ///
    /// # Returns
    /// The active account
    ///
    /// # Errors
    /// * `InvalidRequest` - An active account already uses this user name
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Verify credentials and mint an access/refresh token pair.
    ///
    /// # Arguments
    /// * `user_name` - Raw login identifier (must be email-shaped)
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Access token and refresh token for the account
    ///
    /// # Errors
    /// * `InvalidRequest` - Identifier or password fails shape validation
    /// * `Unauthorized` - Unknown account, inactive account, lookup failure or wrong password
    /// * `Internal` - Token signing failed
    async fn authenticate(&self, user_name: &str, password: &str)
        -> Result<TokenPair, AccountError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    ///
    /// # Arguments
    /// * `refresh_token` - Token previously issued by `authenticate`
    ///
    /// # Returns
    /// New access token
    ///
    /// # Errors
    /// * `InvalidRequest` - Token is empty
    /// * `Unauthorized` - Token is invalid, expired, not a refresh token, or the account is no longer active
    /// * `Internal` - Storage or token signing failed
    async fn refresh(&self, refresh_token: &str) -> Result<String, AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve an active, non-deleted account by user name.
    ///
    /// # Returns
    /// Optional account (None if absent, inactive or deleted)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_active_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Retrieve an active, non-deleted account by identifier.
    ///
    /// # Returns
    /// Optional account (None if absent, inactive or deleted)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_active_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Insert a new account, or reactivate an inactive/deleted one, in one transaction.
    ///
    /// A reactivated account takes the new password hash. Profile details are stored
    /// only when non-empty.
    ///
    /// # Returns
    /// The stored, active account
    ///
    /// # Errors
    /// * `AlreadyExists` - An active account already uses this user name
    /// * `Database` - Database operation failed
    async fn register(&self, account: NewAccount) -> Result<Account, RepositoryError>;
}
