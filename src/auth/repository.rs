// Database repository for user records

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::{error::AuthError, models::User};

const USER_COLUMNS: &str = "id, firstname, lastname, email, mobile, password_hash, role, \
     refresh_token_hash, password_reset_token, password_reset_expires, \
     password_changed_at, created_at";

/// User repository for all credential-lifecycle queries
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the default role
    ///
    /// A unique-constraint violation (concurrent registration racing the
    /// duplicate check) maps to the same duplicate error as the check itself.
    pub async fn create_user(
        &self,
        firstname: &str,
        lastname: &str,
        email: &str,
        mobile: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let query = format!(
            "INSERT INTO users (firstname, lastname, email, mobile, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(firstname)
            .bind(lastname)
            .bind(email)
            .bind(mobile)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AuthError::DuplicateUser;
                    }
                }
                AuthError::DatabaseError(e.to_string())
            })
    }

    /// Check whether the email or mobile is already taken
    pub async fn credentials_in_use(&self, email: &str, mobile: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) OR mobile = $2)",
        )
        .bind(email)
        .bind(mobile)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(exists.0)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Find a user holding the given session-token hash
    pub async fn find_by_session_token(&self, token_hash: &str) -> Result<Option<User>, AuthError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE refresh_token_hash = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Persist the hash of a freshly issued session token
    pub async fn store_session_token(
        &self,
        user_id: i32,
        token_hash: &str,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET refresh_token_hash = $1 WHERE id = $2")
            .bind(token_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Invalidate the current session token (logout)
    pub async fn clear_session_token(&self, user_id: i32) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET refresh_token_hash = NULL WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Store a new password hash (password-update path)
    pub async fn update_password(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let query = format!(
            "UPDATE users SET password_hash = $1, password_changed_at = NOW() \
             WHERE id = $2 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(password_hash)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Persist a reset-token hash and its expiry on the user
    pub async fn set_reset_token(
        &self,
        user_id: i32,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query(
            "UPDATE users SET password_reset_token = $1, password_reset_expires = $2 \
             WHERE id = $3",
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Find a user by email whose reset window is still open
    pub async fn find_by_email_with_active_reset(
        &self,
        email: &str,
    ) -> Result<Option<User>, AuthError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE LOWER(email) = LOWER($1) AND password_reset_expires > NOW()"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Consume a reset token: store the new password hash and clear both
    /// reset fields in one transaction so a token can never be replayed
    pub async fn complete_password_reset(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let query = format!(
            "UPDATE users SET password_hash = $1, \
             password_reset_token = NULL, \
             password_reset_expires = NULL, \
             password_changed_at = NOW() \
             WHERE id = $2 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(password_hash)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }
}
