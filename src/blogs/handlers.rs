// HTTP handlers for blog read endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;

use crate::auth::middleware::AuthenticatedUser;
use crate::blogs::models::{BlogImageRow, BlogResponse, BlogRow};
use crate::error::ApiError;
use crate::AppState;

const BLOG_QUERY: &str = "SELECT b.id, b.title, b.description, b.category, b.author, \
     b.created_at, b.updated_at, \
     EXISTS(SELECT 1 FROM blog_reactions r WHERE r.blog_id = b.id AND r.user_id = $1 AND r.liked) AS is_liked, \
     EXISTS(SELECT 1 FROM blog_reactions r WHERE r.blog_id = b.id AND r.user_id = $1 AND NOT r.liked) AS is_disliked, \
     (SELECT COUNT(*) FROM blog_reactions r WHERE r.blog_id = b.id AND r.liked) AS likes, \
     (SELECT COUNT(*) FROM blog_reactions r WHERE r.blog_id = b.id AND NOT r.liked) AS dislikes \
     FROM blogs b";

async fn images_for_blog(pool: &PgPool, blog_id: i32) -> Result<Vec<BlogImageRow>, ApiError> {
    let images = sqlx::query_as::<_, BlogImageRow>(
        "SELECT blog_id, url, caption FROM blog_images WHERE blog_id = $1 ORDER BY id",
    )
    .bind(blog_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

/// List all blogs with the requester's reaction flags
/// GET /api/blogs
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses(
        (status = 200, description = "List of blogs", body = Vec<BlogResponse>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "blogs"
)]
pub async fn list_blogs_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    tracing::debug!("Listing blogs for user {}", user.user_id);

    let query = format!("{BLOG_QUERY} ORDER BY b.id");
    let rows = sqlx::query_as::<_, BlogRow>(&query)
        .bind(user.user_id)
        .fetch_all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        let images = images_for_blog(&state.db, row.id).await?;
        responses.push(BlogResponse::from_row(row, images));
    }

    Ok(Json(responses))
}

/// Fetch a single blog by id
/// GET /api/blogs/:id
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog found", body = BlogResponse),
        (status = 404, description = "Blog not found")
    ),
    tag = "blogs"
)]
pub async fn get_blog_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<BlogResponse>, ApiError> {
    let query = format!("{BLOG_QUERY} WHERE b.id = $2");
    let row = sqlx::query_as::<_, BlogRow>(&query)
        .bind(user.user_id)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Blog".to_string(),
            id: id.to_string(),
        })?;

    let images = images_for_blog(&state.db, row.id).await?;
    Ok(Json(BlogResponse::from_row(row, images)))
}
