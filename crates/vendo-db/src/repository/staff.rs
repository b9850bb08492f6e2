//! # Staff Repository
//!
//! Staff accounts for the admin surface.
//!
//! Passwords are stored as argon2 PHC strings; plaintext never touches
//! the database. Login verification is constant-work per attempt (hash
//! verification, no early exit on unknown username beyond the lookup).

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use vendo_core::StaffAccount;

/// Repository for staff account operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Creates a staff account, hashing the password with argon2.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - username already taken
    pub async fn create(&self, username: &str, password: &str) -> DbResult<StaffAccount> {
        debug!(username, "Creating staff account");

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbError::Internal(format!("password hashing failed: {e}")))?
            .to_string();

        let now = Utc::now();

        let account = sqlx::query_as::<_, StaffAccount>(
            "INSERT INTO staff (username, password_hash, created_at) \
             VALUES (?1, ?2, ?3) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(username, "Staff account created");
        Ok(account)
    }

    /// Looks up a staff account by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<StaffAccount>> {
        let account = sqlx::query_as::<_, StaffAccount>(
            "SELECT id, username, password_hash, created_at FROM staff WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Verifies a username/password pair.
    ///
    /// ## Returns
    /// * `Ok(Some(account))` - credentials valid
    /// * `Ok(None)` - unknown username or wrong password (caller cannot
    ///   tell which; the login response must not leak the difference)
    pub async fn verify_login(
        &self,
        username: &str,
        password: &str,
    ) -> DbResult<Option<StaffAccount>> {
        let Some(account) = self.get_by_username(username).await? else {
            return Ok(None);
        };

        let parsed = PasswordHash::new(&account.password_hash)
            .map_err(|e| DbError::Internal(format!("stored password hash is invalid: {e}")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    /// Counts staff accounts (used by the seed loader).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
