// Authentication module
// Opaque bearer-token authentication with registration, login, token
// refresh, and the password-reset lifecycle

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notifier;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{
    admin_login_handler, forgot_password_handler, login_handler, logout_handler, refresh_handler,
    register_handler, reset_password_handler, update_password_handler,
};
pub use middleware::AuthenticatedUser;
pub use models::{
    AuthData, AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    LogoutResponse, RefreshResponse, RegisterRequest, ResetPasswordRequest, Role,
    UpdatePasswordRequest, User, UserEnvelope, UserResponse,
};
pub use notifier::{LogNotifier, Notifier};
pub use repository::UserRepository;
pub use service::AuthService;
