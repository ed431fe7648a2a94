// Blog read-model rows and their JSON projection

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Blog row joined with reaction aggregates for the requesting user
#[derive(Debug, Clone, FromRow)]
pub struct BlogRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_liked: bool,
    pub is_disliked: bool,
    pub likes: i64,
    pub dislikes: i64,
}

/// Image row attached to a blog
#[derive(Debug, Clone, FromRow)]
pub struct BlogImageRow {
    pub blog_id: i32,
    pub url: String,
    pub caption: Option<String>,
}

/// Nested image projection
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BlogImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl From<BlogImageRow> for BlogImage {
    fn from(row: BlogImageRow) -> Self {
        Self {
            url: row.url,
            caption: row.caption,
        }
    }
}

/// Read-only JSON projection of a blog entity
///
/// Pure shape transformation: like/dislike flags are relative to the
/// authenticated requester, counts are global.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlogResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_liked: bool,
    pub is_disliked: bool,
    pub likes: i64,
    pub dislikes: i64,
    pub images: Vec<BlogImage>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogResponse {
    pub fn from_row(row: BlogRow, images: Vec<BlogImageRow>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            is_liked: row.is_liked,
            is_disliked: row.is_disliked,
            likes: row.likes,
            dislikes: row.dislikes,
            images: images.into_iter().map(BlogImage::from).collect(),
            author: row.author,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
