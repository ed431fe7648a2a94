// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// User role stored in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub role: Role,
    pub refresh_token_hash: Option<String>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// User response model (excludes password hash and token columns)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            mobile: user.mobile,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub firstname: String,
    #[validate(length(min = 1, max = 255))]
    pub lastname: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "crate::validation::validate_mobile")]
    pub mobile: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Login request DTO (shared by user and admin login)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Password update request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 6), must_match = "new_password_confirmation")]
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// Forgot-password request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Reset-password request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6), must_match = "password_confirmation")]
    pub password: String,
    pub password_confirmation: String,
}

/// Public user fields plus the freshly issued session token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub mobile: String,
    pub token: String,
}

impl AuthData {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            token,
        }
    }
}

/// Envelope for register/login responses
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub data: AuthData,
    pub message: String,
}

/// Envelope for responses carrying a serialized user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub data: UserResponse,
    pub message: String,
}

/// Token refresh response
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub status: bool,
    pub access_token: String,
}

/// Logout response
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub status: bool,
    pub message: String,
}

/// Forgot-password response
///
/// The token field is omitted when no account matches the email, so the
/// response shape never reveals whether an address is registered.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForgotPasswordResponse {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub message: String,
}
