//! Data Transfer Objects.
//!
//! Public pages are rendered as a [`PageContext`]: the site-wide
//! navigation plus a page-specific body flattened alongside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---- public pages ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContext<T> {
    pub site_name: String,
    pub title: String,
    pub navigation: Navigation,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Navigation {
    pub categories: Vec<CategoryLink>,
    pub popular_tags: Vec<TagLink>,
    pub recent_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLink {
    pub name: String,
    pub slug: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagLink {
    pub name: String,
    pub slug: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<u64>,
}

/// A post as it appears in listings and sidebars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
    pub url: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub views: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Body of the home, category, tag and search pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub posts: Vec<PostSummary>,
    pub page: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub title: String,
    pub slug: String,
    pub url: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub views: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub category: Option<CategoryLink>,
    pub tags: Vec<TagLink>,
}

/// Public view of an approved comment; the email is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailBody {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub related_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AboutBody {}

// ---- admin ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Comment ids for a bulk moderation action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkIdsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateResponse {
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagIdsRequest {
    pub tag_ids: Vec<Uuid>,
}

/// Query string accepted by admin list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub category: Option<Uuid>,
    pub tag: Option<Uuid>,
    pub post: Option<Uuid>,
    pub approved: Option<bool>,
    pub page: Option<u64>,
}
