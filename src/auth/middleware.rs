// Bearer-token authentication extractor for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, models::Role, token::TokenService};
use crate::AppState;

/// Authenticated user extractor for protected routes
///
/// The presented bearer token is hashed and matched against the session
/// token hash stored on the user row; the raw token is never compared or
/// persisted.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidToken)?;

        let state = AppState::from_ref(state);
        let token_hash = TokenService::hash_token(token);
        let user = state
            .auth
            .users()
            .find_by_session_token(&token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        debug!(user_id = user.id, "authenticated bearer token");
        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}
