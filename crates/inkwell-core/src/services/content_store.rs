//! Content store write path.
//!
//! Every create/update runs the pure `rules::prepare_*` transform and the
//! matching `rules::validate_*` check before the repository is touched.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryInput, Comment, CommentInput, CommentSubmission, Post, PostInput, Tag,
    TagInput,
};
use crate::error::DomainError;
use crate::ports::{CommentFilter, Page, PostFilter};
use crate::rules;

use super::repositories::Repositories;

/// Result of a public comment form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Created(Comment),
    /// A required field was blank or too long; nothing was stored.
    Ignored,
}

/// Administrative CRUD over categories, tags, posts and comments.
#[derive(Clone)]
pub struct ContentStore {
    repos: Repositories,
}

impl ContentStore {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    // ---- categories ----

    pub async fn get_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.repos
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn list_categories(&self, search: Option<&str>) -> Result<Vec<Category>, DomainError> {
        Ok(self.repos.categories.list(search).await?)
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let mut category = Category::new(
            input.name,
            input.slug.unwrap_or_default().trim().to_string(),
            input.description,
        );
        rules::prepare_category(&mut category);
        rules::validate_category(&category)?;

        let slug = category.slug.clone();
        let saved = self
            .repos
            .categories
            .insert(category)
            .await
            .map_err(|e| DomainError::from_write("Category", &slug, e))?;

        tracing::info!(category_id = %saved.id, slug = %saved.slug, "Category created");
        Ok(saved)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<Category, DomainError> {
        let mut category = self.get_category(id).await?;
        category.name = input.name;
        category.slug = input.slug.unwrap_or_default().trim().to_string();
        category.description = input.description;
        rules::prepare_category(&mut category);
        rules::validate_category(&category)?;

        let slug = category.slug.clone();
        let saved = self
            .repos
            .categories
            .update(category)
            .await
            .map_err(|e| DomainError::from_write("Category", &slug, e))?;

        tracing::info!(category_id = %saved.id, "Category updated");
        Ok(saved)
    }

    /// Delete a category. Its posts are kept with their category cleared.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        self.repos
            .categories
            .delete(id)
            .await
            .map_err(|e| DomainError::from_write("Category", &id.to_string(), e))?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    // ---- tags ----

    pub async fn get_tag(&self, id: Uuid) -> Result<Tag, DomainError> {
        self.repos
            .tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    pub async fn list_tags(&self, search: Option<&str>) -> Result<Vec<Tag>, DomainError> {
        Ok(self.repos.tags.list(search).await?)
    }

    pub async fn create_tag(&self, input: TagInput) -> Result<Tag, DomainError> {
        let mut tag = Tag::new(input.name, input.slug.unwrap_or_default().trim().to_string());
        rules::prepare_tag(&mut tag);
        rules::validate_tag(&tag)?;

        let slug = tag.slug.clone();
        let saved = self
            .repos
            .tags
            .insert(tag)
            .await
            .map_err(|e| DomainError::from_write("Tag", &slug, e))?;

        tracing::info!(tag_id = %saved.id, slug = %saved.slug, "Tag created");
        Ok(saved)
    }

    pub async fn update_tag(&self, id: Uuid, input: TagInput) -> Result<Tag, DomainError> {
        let mut tag = self.get_tag(id).await?;
        tag.name = input.name;
        tag.slug = input.slug.unwrap_or_default().trim().to_string();
        rules::prepare_tag(&mut tag);
        rules::validate_tag(&tag)?;

        let slug = tag.slug.clone();
        let saved = self
            .repos
            .tags
            .update(tag)
            .await
            .map_err(|e| DomainError::from_write("Tag", &slug, e))?;

        tracing::info!(tag_id = %saved.id, "Tag updated");
        Ok(saved)
    }

    /// Delete a tag. Only its post associations go with it.
    pub async fn delete_tag(&self, id: Uuid) -> Result<(), DomainError> {
        self.repos
            .tags
            .delete(id)
            .await
            .map_err(|e| DomainError::from_write("Tag", &id.to_string(), e))?;
        tracing::info!(tag_id = %id, "Tag deleted");
        Ok(())
    }

    // ---- posts ----

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Posts of any status matching `filter`.
    pub async fn list_posts(&self, filter: &PostFilter, page: Page) -> Result<Vec<Post>, DomainError> {
        Ok(self.repos.posts.list(filter, page).await?)
    }

    pub async fn count_posts(&self, filter: &PostFilter) -> Result<u64, DomainError> {
        Ok(self.repos.posts.count(filter).await?)
    }

    pub async fn post_tags(&self, post_id: Uuid) -> Result<Vec<Tag>, DomainError> {
        Ok(self.repos.tags.list_for_post(post_id).await?)
    }

    /// Create a post authored by `author_id`.
    pub async fn create_post(&self, author_id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let tag_ids = self.checked_tag_ids(&input.tag_ids).await?;

        let mut post = Post::new(author_id, String::new(), String::new());
        post.apply(&input);
        rules::prepare_post(&mut post, Utc::now());
        rules::validate_post(&post)?;

        let slug = post.slug.clone();
        let saved = self
            .repos
            .posts
            .insert(post)
            .await
            .map_err(|e| DomainError::from_write("Post", &slug, e))?;
        self.repos
            .posts
            .set_tags(saved.id, &tag_ids)
            .await
            .map_err(|e| DomainError::from_write("Post", &slug, e))?;

        tracing::info!(
            post_id = %saved.id,
            slug = %saved.slug,
            status = %saved.status,
            "Post created"
        );
        Ok(saved)
    }

    /// Replace a post's editable fields. Derived fields are recomputed as
    /// needed; an existing `published_at` survives unless explicitly set.
    pub async fn update_post(&self, id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let mut post = self.get_post(id).await?;
        let tag_ids = self.checked_tag_ids(&input.tag_ids).await?;

        post.apply(&input);
        rules::prepare_post(&mut post, Utc::now());
        rules::validate_post(&post)?;

        let slug = post.slug.clone();
        let saved = self
            .repos
            .posts
            .update(post)
            .await
            .map_err(|e| DomainError::from_write("Post", &slug, e))?;
        self.repos
            .posts
            .set_tags(saved.id, &tag_ids)
            .await
            .map_err(|e| DomainError::from_write("Post", &slug, e))?;

        tracing::info!(post_id = %saved.id, status = %saved.status, "Post updated");
        Ok(saved)
    }

    pub async fn set_post_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), DomainError> {
        let post = self.get_post(post_id).await?;
        let tag_ids = self.checked_tag_ids(tag_ids).await?;
        self.repos
            .posts
            .set_tags(post.id, &tag_ids)
            .await
            .map_err(|e| DomainError::from_write("Post", &post.slug, e))
    }

    /// Delete a post together with its comments and tag associations.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.repos
            .posts
            .delete(id)
            .await
            .map_err(|e| DomainError::from_write("Post", &id.to_string(), e))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn checked_tag_ids(&self, tag_ids: &[Uuid]) -> Result<Vec<Uuid>, DomainError> {
        let mut unique = Vec::with_capacity(tag_ids.len());
        for id in tag_ids {
            if unique.contains(id) {
                continue;
            }
            if self.repos.tags.find_by_id(*id).await?.is_none() {
                return Err(DomainError::ForeignKey(format!("Tag {id} does not exist")));
            }
            unique.push(*id);
        }
        Ok(unique)
    }

    // ---- comments ----

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.repos
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    pub async fn list_comments(&self, filter: &CommentFilter) -> Result<Vec<Comment>, DomainError> {
        Ok(self.repos.comments.list(filter).await?)
    }

    /// Create a comment through the admin. Unapproved unless the input says otherwise.
    pub async fn create_comment(&self, input: CommentInput) -> Result<Comment, DomainError> {
        let mut comment = Comment::new(
            input.post_id,
            input.author_name.trim().to_string(),
            input.author_email.trim().to_string(),
            input.content,
        );
        comment.is_approved = input.is_approved;
        rules::validate_comment(&comment)?;
        rules::validate_email(&comment.author_email)?;

        let saved = self
            .repos
            .comments
            .insert(comment)
            .await
            .map_err(|e| DomainError::from_write("Comment", &input.post_id.to_string(), e))?;

        tracing::info!(comment_id = %saved.id, post_id = %saved.post_id, "Comment created");
        Ok(saved)
    }

    pub async fn update_comment(&self, id: Uuid, input: CommentInput) -> Result<Comment, DomainError> {
        let mut comment = self.get_comment(id).await?;
        comment.post_id = input.post_id;
        comment.author_name = input.author_name.trim().to_string();
        comment.author_email = input.author_email.trim().to_string();
        comment.content = input.content;
        comment.is_approved = input.is_approved;
        rules::validate_comment(&comment)?;
        rules::validate_email(&comment.author_email)?;

        let saved = self
            .repos
            .comments
            .update(comment)
            .await
            .map_err(|e| DomainError::from_write("Comment", &id.to_string(), e))?;

        tracing::info!(comment_id = %saved.id, "Comment updated");
        Ok(saved)
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), DomainError> {
        self.repos
            .comments
            .delete(id)
            .await
            .map_err(|e| DomainError::from_write("Comment", &id.to_string(), e))?;
        tracing::info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    /// Bulk-approve comments. Unknown ids are skipped.
    pub async fn approve_comments(&self, ids: &[Uuid]) -> Result<u64, DomainError> {
        let updated = self.repos.comments.set_approval(ids, true).await?;
        tracing::info!(requested = ids.len(), updated, "Comments approved");
        Ok(updated)
    }

    /// Bulk-disapprove comments. Unknown ids are skipped.
    pub async fn disapprove_comments(&self, ids: &[Uuid]) -> Result<u64, DomainError> {
        let updated = self.repos.comments.set_approval(ids, false).await?;
        tracing::info!(requested = ids.len(), updated, "Comments disapproved");
        Ok(updated)
    }

    /// Handle the public comment form of a published post.
    ///
    /// Blank (after trimming) or oversized fields are ignored silently.
    /// Accepted comments are stored already approved.
    pub async fn submit_comment(
        &self,
        post_slug: &str,
        form: CommentSubmission,
    ) -> Result<SubmissionOutcome, DomainError> {
        let post = self
            .repos
            .posts
            .find_by_slug(post_slug)
            .await?
            .filter(Post::is_published)
            .ok_or_else(|| DomainError::not_found("Post", post_slug))?;

        let comment = Comment::new(
            post.id,
            form.author_name.trim().to_string(),
            form.author_email.trim().to_string(),
            form.content.trim().to_string(),
        )
        .approved();

        if let Err(reason) = rules::validate_comment(&comment) {
            tracing::debug!(post_id = %post.id, %reason, "Ignoring comment submission");
            return Ok(SubmissionOutcome::Ignored);
        }

        let saved = self
            .repos
            .comments
            .insert(comment)
            .await
            .map_err(|e| DomainError::from_write("Comment", post_slug, e))?;

        tracing::info!(comment_id = %saved.id, post_id = %post.id, "Public comment stored");
        Ok(SubmissionOutcome::Created(saved))
    }
}
