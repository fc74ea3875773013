//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{nonce::Nonce, wallet_address::WalletAddress};
use crate::error::{AuthError, AuthResult};

const ACCOUNT_COLUMNS: &str = "id, address, nonce, created_at, updated_at, last_login_at";

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and verify it with a round trip.
    pub async fn connect(database_url: &str, max_connections: u32) -> AuthResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let repo = Self::new(pool);
        repo.ping().await?;
        Ok(repo)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool; waits for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Account store closed");
    }
}

impl AccountRepository for PgAccountRepository {
    async fn upsert_nonce(
        &self,
        address: &WalletAddress,
        nonce: &Nonce,
        now: DateTime<Utc>,
    ) -> AuthResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (id, address, nonce, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (address) DO UPDATE
                SET nonce = EXCLUDED.nonce,
                    updated_at = EXCLUDED.updated_at
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(address.as_str())
        .bind(nonce.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_account())
    }

    async fn insert(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, address, nonce, created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.address.as_str())
        .bind(account.nonce.as_str())
        .bind(account.created_at)
        .bind(account.updated_at)
        .bind(account.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                AuthError::DuplicateAddress(account.address.to_string())
            } else {
                AuthError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_address(&self, address: &WalletAddress) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE address = $1"
        ))
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn find_by_id(&self, id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn record_login(
        &self,
        id: &AccountId,
        nonce: &Nonce,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        let updated = sqlx::query("UPDATE accounts SET nonce = $2, last_login_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(nonce.as_str())
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> AuthResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    address: String,
    nonce: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            id: AccountId::from_uuid(self.id),
            address: WalletAddress::from_normalized(self.address),
            nonce: Nonce::from_stored(self.nonce),
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login_at: self.last_login_at,
        }
    }
}
