// Blog read-model module
// Read-only JSON projections of blog entities; no business logic

pub mod handlers;
pub mod models;

pub use handlers::{get_blog_handler, list_blogs_handler};
pub use models::{BlogImage, BlogResponse};
