use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, CategoryCount, Comment, Post, PostStatus, Tag, TagCount, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` if absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, applying the schema's cascade rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Offset/limit window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for the 1-based page `number` of `per_page` items.
    pub fn number(number: u64, per_page: u64) -> Self {
        Self {
            offset: number.saturating_sub(1).saturating_mul(per_page),
            limit: per_page,
        }
    }

    pub fn first(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

/// Post selection criteria. Results are always ordered by
/// `published_at` descending (nulls last), then `created_at` descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    /// Case-insensitive substring matched against title, content or excerpt.
    pub text: Option<String>,
    pub exclude_id: Option<Uuid>,
}

impl PostFilter {
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_tag(mut self, tag_id: Uuid) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn excluding(mut self, post_id: Uuid) -> Self {
        self.exclude_id = Some(post_id);
        self
    }
}

/// Comment selection criteria. Results are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFilter {
    pub post_id: Option<Uuid>,
    pub is_approved: Option<bool>,
    /// Case-insensitive substring matched against author name, email or content.
    pub text: Option<String>,
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by name, optionally matching `search`
    /// against name or description.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Category>, RepoError>;

    /// Categories with at least one post in `status`, with that count.
    async fn with_post_counts(
        &self,
        status: PostStatus,
    ) -> Result<Vec<CategoryCount>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// All tags ordered by name, optionally matching `search` against name.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Tag>, RepoError>;

    /// Tags attached to the given post, ordered by name.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    /// Tags with at least one post in `status`, with that count.
    async fn with_post_counts(&self, status: PostStatus) -> Result<Vec<TagCount>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn list(&self, filter: &PostFilter, page: Page) -> Result<Vec<Post>, RepoError>;

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Write only the view counter; `updated_at` is left untouched.
    async fn set_views(&self, post_id: Uuid, views: u64) -> Result<(), RepoError>;

    /// Replace the post's tag associations.
    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError>;

    /// Set `is_approved` on every listed comment, returning how many matched.
    async fn set_approval(&self, ids: &[Uuid], approved: bool) -> Result<u64, RepoError>;
}
