mod auth;
mod blogs;
mod db;
mod error;
mod validation;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, LogNotifier, UserRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::admin_login_handler,
        auth::handlers::refresh_handler,
        auth::handlers::logout_handler,
        auth::handlers::update_password_handler,
        auth::handlers::forgot_password_handler,
        auth::handlers::reset_password_handler,
        blogs::handlers::list_blogs_handler,
        blogs::handlers::get_blog_handler,
    ),
    components(
        schemas(
            auth::models::Role,
            auth::models::UserResponse,
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::UpdatePasswordRequest,
            auth::models::ForgotPasswordRequest,
            auth::models::ResetPasswordRequest,
            auth::models::AuthData,
            auth::models::AuthResponse,
            auth::models::UserEnvelope,
            auth::models::RefreshResponse,
            auth::models::LogoutResponse,
            auth::models::ForgotPasswordResponse,
            blogs::models::BlogImage,
            blogs::models::BlogResponse,
        )
    ),
    tags(
        (name = "auth", description = "User registration, login, and password lifecycle"),
        (name = "blogs", description = "Read-only blog projections")
    ),
    info(
        title = "Blog API",
        version = "1.0.0",
        description = "Authentication and blog backend for the blog platform"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    db: PgPool,
    auth: AuthService,
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool, app_url: String) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let auth_service = AuthService::new(
        UserRepository::new(db.clone()),
        Arc::new(LogNotifier),
        app_url,
    );
    let state = AppState {
        db,
        auth: auth_service,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth routes
        .route("/api/users/register", post(auth::register_handler))
        .route("/api/users/login", post(auth::login_handler))
        .route("/api/users/admin/login", post(auth::admin_login_handler))
        .route("/api/users/refresh-token", post(auth::refresh_handler))
        .route("/api/users/logout", post(auth::logout_handler))
        .route(
            "/api/users/:id/update-password",
            put(auth::update_password_handler),
        )
        .route(
            "/api/users/forgot-password",
            post(auth::forgot_password_handler),
        )
        .route(
            "/api/users/reset-password",
            post(auth::reset_password_handler),
        )
        // Blog routes
        .route("/api/blogs", get(blogs::list_blogs_handler))
        .route("/api/blogs/:id", get(blogs::get_blog_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Blog API - Starting...");

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    // Base for password-reset links embedded in notifications
    let app_url = std::env::var("APP_URL")
        .unwrap_or_else(|_| "http://localhost:8000/api/users".to_string());

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let app = create_router(db_pool, app_url);

    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Blog API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
