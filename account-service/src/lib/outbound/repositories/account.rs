use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;

use crate::account::errors::RepositoryError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountProfile;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::UserName;
use crate::domain::account::ports::AccountRepository;

const ACCOUNT_COLUMNS: &str =
    "id, user_name, password, is_active, is_deleted, created_at, updated_at";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    user_name: String,
    password: String,
    is_active: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let user_name = UserName::new(row.user_name)
            .map_err(|e| RepositoryError::Database(format!("Stored user name is invalid: {}", e)))?;

        Ok(Account {
            id: AccountId(row.id),
            user_name,
            password_hash: row.password,
            is_active: row.is_active,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

async fn insert_profile(
    tx: &mut Transaction<'_, Postgres>,
    account_id: i64,
    profile: &AccountProfile,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO user_infos (user_account_id, name, phone, email, gender)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(account_id)
    .bind(profile.name.as_deref())
    .bind(profile.phone.as_deref())
    .bind(profile.email.as_deref())
    .bind(profile.gender.map(|g| g.as_str()))
    .execute(&mut **tx)
    .await
    .map_err(database_error)?;

    Ok(())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_active_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<Account>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM user_accounts WHERE user_name = $1 AND is_active AND NOT is_deleted",
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, AccountRow>(&query)
            .bind(user_name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_active_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM user_accounts WHERE id = $1 AND is_active AND NOT is_deleted",
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, AccountRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(Account::try_from)
            .transpose()
    }

    async fn register(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let select = format!(
            "SELECT {} FROM user_accounts WHERE user_name = $1 FOR UPDATE",
            ACCOUNT_COLUMNS
        );
        let existing = sqlx::query_as::<_, AccountRow>(&select)
            .bind(account.user_name.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?;

        let row = match existing {
            Some(row) if row.is_active && !row.is_deleted => {
                return Err(RepositoryError::AlreadyExists(
                    account.user_name.to_string(),
                ));
            }
            Some(row) => {
                let update = format!(
                    r#"
                    UPDATE user_accounts
                    SET password = $2, is_active = TRUE, is_deleted = FALSE,
                        deleted_at = NULL, updated_at = NOW()
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    ACCOUNT_COLUMNS
                );

                sqlx::query_as::<_, AccountRow>(&update)
                    .bind(row.id)
                    .bind(&account.password_hash)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(database_error)?
            }
            None => {
                let insert = format!(
                    r#"
                    INSERT INTO user_accounts (user_name, password)
                    VALUES ($1, $2)
                    RETURNING {}
                    "#,
                    ACCOUNT_COLUMNS
                );

                sqlx::query_as::<_, AccountRow>(&insert)
                    .bind(account.user_name.as_str())
                    .bind(&account.password_hash)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| {
                        if let Some(db_err) = e.as_database_error() {
                            if db_err.is_unique_violation() {
                                return RepositoryError::AlreadyExists(
                                    account.user_name.to_string(),
                                );
                            }
                        }
                        database_error(e)
                    })?
            }
        };

        if !account.profile.is_empty() {
            insert_profile(&mut tx, row.id, &account.profile).await?;
        }

        tx.commit().await.map_err(database_error)?;

        Account::try_from(row)
    }
}
