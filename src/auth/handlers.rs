// HTTP handlers for authentication endpoints

use axum::{
    extract::{Path, State},
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        AuthData, AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
        LogoutResponse, RefreshResponse, RegisterRequest, ResetPasswordRequest,
        UpdatePasswordRequest, UserEnvelope,
    },
    token::SESSION_COOKIE_TTL_MINUTES,
};
use crate::AppState;

const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Build the long-lived HTTP-only cookie carrying the raw user id
///
/// The raw-id design is inherited from the original API; refresh exchanges
/// this id for a fresh bearer token.
fn access_token_cookie(user_id: i32) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = SESSION_COOKIE_TTL_MINUTES * 60;
    HeaderValue::from_str(&format!(
        "{ACCESS_TOKEN_COOKIE}={user_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    ))
}

fn clear_access_token_cookie() -> HeaderValue {
    HeaderValue::from_static("access_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the access-token cookie value out of the Cookie header, if present
fn extract_access_token_cookie(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == ACCESS_TOKEN_COOKIE {
            return Some(val.to_string());
        }
    }
    None
}

fn session_cookie_headers(user_id: i32) -> Result<HeaderMap, AuthError> {
    let cookie =
        access_token_cookie(user_id).map_err(|e| AuthError::Internal(e.to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}

/// Register a new user
/// POST /api/users/register
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "User details already exists")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::debug!("Registration attempt for {}", request.email);

    let (user, token) = state.auth.register(request).await?;
    let headers = session_cookie_headers(user.id)?;

    tracing::info!("Registered user id {}", user.id);
    let body = AuthResponse {
        success: true,
        data: AuthData::new(&user, token),
        message: "User created successfully".to_string(),
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

/// Login a user
/// POST /api/users/login
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User logged in successfully", body = AuthResponse),
        (status = 401, description = "Invalid Credentials")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::debug!("Login attempt for {}", request.email);

    let (user, token) = state.auth.login(request).await?;
    let headers = session_cookie_headers(user.id)?;

    let body = AuthResponse {
        success: true,
        data: AuthData::new(&user, token),
        message: "User logged in successfully".to_string(),
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

/// Login an admin
/// POST /api/users/admin/login
#[utoipa::path(
    post,
    path = "/api/users/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin logged in successfully", body = AuthResponse),
        (status = 401, description = "Invalid Credentials"),
        (status = 403, description = "Account is not an admin")
    ),
    tag = "auth"
)]
pub async fn admin_login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    tracing::debug!("Admin login attempt for {}", request.email);

    let (user, token) = state.auth.login_admin(request).await?;
    let headers = session_cookie_headers(user.id)?;

    let body = AuthResponse {
        success: true,
        data: AuthData::new(&user, token),
        message: "Admin logged in successfully".to_string(),
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

/// Exchange the access-token cookie for a fresh session token
/// POST /api/users/refresh-token
#[utoipa::path(
    post,
    path = "/api/users/refresh-token",
    responses(
        (status = 200, description = "Fresh token issued", body = RefreshResponse),
        (status = 401, description = "Missing cookie or unknown user")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, AuthError> {
    let raw = extract_access_token_cookie(&headers).ok_or(AuthError::MissingRefreshCookie)?;
    // A cookie value that is not a user id cannot match any user
    let user_id: i32 = raw.parse().map_err(|_| AuthError::UnknownRefreshUser)?;

    let access_token = state.auth.refresh_token(user_id).await?;
    Ok(Json(RefreshResponse {
        status: true,
        access_token,
    }))
}

/// Invalidate the caller's session token and clear the cookie
/// POST /api/users/logout
#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 200, description = "Logout successful", body = LogoutResponse),
        (status = 401, description = "Not authenticated")
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AuthError> {
    state.auth.logout(user.user_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_access_token_cookie());

    tracing::info!("User id {} logged out", user.user_id);
    let body = LogoutResponse {
        status: true,
        message: "Logout successful".to_string(),
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

/// Change a user's password
/// PUT /api/users/:id/update-password
#[utoipa::path(
    put,
    path = "/api/users/{id}/update-password",
    params(("id" = i32, Path, description = "Target user id")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully", body = UserEnvelope),
        (status = 401, description = "Current password is incorrect"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
pub async fn update_password_handler(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<UserEnvelope>, AuthError> {
    let user = state.auth.update_password(user_id, request).await?;

    Ok(Json(UserEnvelope {
        success: true,
        data: user.into(),
        message: "Password changed successfully".to_string(),
    }))
}

/// Issue a password-reset token and send the reset link
/// POST /api/users/forgot-password
#[utoipa::path(
    post,
    path = "/api/users/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = ForgotPasswordResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AuthError> {
    let token = state.auth.forgot_password(request).await?;

    Ok(Json(ForgotPasswordResponse {
        status: true,
        token,
        message: "Please check your mail, we have sent a password reset link valid for the next 10 minutes".to_string(),
    }))
}

/// Consume a reset token and set the new password
/// POST /api/users/reset-password
#[utoipa::path(
    post,
    path = "/api/users/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset successfully", body = UserEnvelope),
        (status = 400, description = "Invalid token or email provided"),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "auth"
)]
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<UserEnvelope>, AuthError> {
    let user = state.auth.reset_password(request).await?;

    Ok(Json(UserEnvelope {
        success: true,
        data: user.into(),
        message: "Password reset successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_build_and_parse_round_trip() {
        let cookie = access_token_cookie(42).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::COOKIE, cookie);

        assert_eq!(
            extract_access_token_cookie(&headers),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_cookie_is_http_only_and_long_lived() {
        let cookie = access_token_cookie(7).unwrap();
        let value = cookie.to_str().unwrap();
        assert!(value.contains("HttpOnly"));
        assert!(value.contains(&format!("Max-Age={}", SESSION_COOKIE_TTL_MINUTES * 60)));
    }

    #[test]
    fn test_extract_finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=9; lang=en"),
        );
        assert_eq!(extract_access_token_cookie(&headers), Some("9".to_string()));
    }

    #[test]
    fn test_extract_missing_cookie() {
        let headers = HeaderMap::new();
        assert_eq!(extract_access_token_cookie(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark"),
        );
        assert_eq!(extract_access_token_cookie(&headers), None);
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let value = clear_access_token_cookie();
        assert!(value.to_str().unwrap().contains("Max-Age=0"));
    }
}
