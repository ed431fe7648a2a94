// Authentication service - the credential-lifecycle business logic

use std::sync::Arc;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{
        ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, Role,
        UpdatePasswordRequest, User,
    },
    notifier::{build_reset_url, Notifier},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating all credential operations
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    notifier: Arc<dyn Notifier>,
    app_url: String,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// `app_url` is the base for reset links embedded in notifications.
    pub fn new(users: UserRepository, notifier: Arc<dyn Notifier>, app_url: String) -> Self {
        Self {
            users,
            notifier,
            app_url,
        }
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Register a new user
    ///
    /// 1. Validates the request
    /// 2. Rejects when the email OR mobile is already taken
    /// 3. Hashes the password and creates the record
    /// 4. Issues a session token and persists its hash
    pub async fn register(&self, request: RegisterRequest) -> Result<(User, String), AuthError> {
        request.validate()?;

        if self
            .users
            .credentials_in_use(&request.email, &request.mobile)
            .await?
        {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        // A concurrent registration can still race the check above; the
        // unique constraints map that to DuplicateUser inside create_user.
        let user = self
            .users
            .create_user(
                &request.firstname,
                &request.lastname,
                &request.email,
                &request.mobile,
                &password_hash,
            )
            .await?;

        let token = self.issue_session_token(user.id).await?;
        Ok((user, token))
    }

    /// Login a user
    ///
    /// Existence is checked before any hash verification so a missing
    /// record and a wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<(User, String), AuthError> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_session_token(user.id).await?;
        Ok((user, token))
    }

    /// Login an admin: regular login plus a role check
    pub async fn login_admin(&self, request: LoginRequest) -> Result<(User, String), AuthError> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if user.role != Role::Admin {
            return Err(AuthError::AdminOnly);
        }

        let token = self.issue_session_token(user.id).await?;
        Ok((user, token))
    }

    /// Exchange the cookie-held user id for a fresh session token
    ///
    /// The new token's hash is persisted, symmetric with login.
    pub async fn refresh_token(&self, user_id: i32) -> Result<String, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownRefreshUser)?;

        self.issue_session_token(user.id).await
    }

    /// Invalidate the caller's current session token
    pub async fn logout(&self, user_id: i32) -> Result<(), AuthError> {
        self.users.clear_session_token(user_id).await
    }

    /// Change a user's password after verifying the current one
    pub async fn update_password(
        &self,
        target_id: i32,
        request: UpdatePasswordRequest,
    ) -> Result<User, AuthError> {
        request.validate()?;

        let user = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or(AuthError::UserNotFound(target_id))?;

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::IncorrectCurrentPassword);
        }

        let new_hash = PasswordService::hash_password(&request.new_password)?;
        self.users.update_password(user.id, &new_hash).await
    }

    /// Issue a password-reset token and hand the reset link to the notifier
    ///
    /// Returns `None` when no account matches; callers respond with the
    /// same success-shaped body either way so account existence never
    /// leaks through this endpoint.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<Option<String>, AuthError> {
        request.validate()?;

        let Some(user) = self.users.find_by_email(&request.email).await? else {
            return Ok(None);
        };

        let token = TokenService::generate_token();
        let token_hash = TokenService::hash_token(&token);
        let expires_at = TokenService::reset_token_expiry();
        self.users
            .set_reset_token(user.id, &token_hash, expires_at)
            .await?;

        let reset_url = build_reset_url(&self.app_url, &user.email, &token);
        self.notifier.send_password_reset(&user.email, &reset_url)?;

        Ok(Some(token))
    }

    /// Consume a reset token and store the new password
    ///
    /// Expired windows, unknown emails, and wrong tokens all collapse to
    /// the same invalid-token error. Unexpected store failures surface as
    /// Internal with the underlying message; validation failures stay 4xx.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<User, AuthError> {
        request.validate()?;

        let user = self
            .users
            .find_by_email_with_active_reset(&request.email)
            .await
            .map_err(internalize)?
            .ok_or(AuthError::InvalidResetToken)?;

        let presented_hash = TokenService::hash_token(&request.token);
        let stored_hash = user
            .password_reset_token
            .as_deref()
            .ok_or(AuthError::InvalidResetToken)?;
        if presented_hash != stored_hash {
            return Err(AuthError::InvalidResetToken);
        }

        let new_hash = PasswordService::hash_password(&request.password).map_err(internalize)?;
        self.users
            .complete_password_reset(user.id, &new_hash)
            .await
            .map_err(internalize)
    }

    /// Generate a session token, persist its hash, return the plaintext
    async fn issue_session_token(&self, user_id: i32) -> Result<String, AuthError> {
        let token = TokenService::generate_token();
        let token_hash = TokenService::hash_token(&token);
        self.users.store_session_token(user_id, &token_hash).await?;
        Ok(token)
    }
}

/// Reset-password boundary policy: unexpected failures become Internal
/// (echoing the cause), expected 4xx outcomes pass through untouched.
fn internalize(err: AuthError) -> AuthError {
    match err {
        AuthError::DatabaseError(msg) => AuthError::Internal(msg),
        AuthError::PasswordHashError => AuthError::Internal("Password hashing error".to_string()),
        other => other,
    }
}
