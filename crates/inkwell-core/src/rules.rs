//! Save-time rules: derived fields and field validation.
//!
//! Every write goes through `prepare_*` and then `validate_*` before it
//! reaches a repository. The functions are pure; the caller supplies `now`.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Comment, Post, PostStatus, Tag};
use crate::error::DomainError;
use crate::slug::{is_valid_slug, slugify};

/// Number of content characters kept in a derived excerpt.
pub const EXCERPT_LENGTH: usize = 200;

pub const CATEGORY_NAME_MAX: usize = 100;
pub const TAG_NAME_MAX: usize = 50;
pub const POST_TITLE_MAX: usize = 200;
pub const POST_EXCERPT_MAX: usize = 300;
pub const FEATURED_IMAGE_MAX: usize = 100;
pub const COMMENT_NAME_MAX: usize = 100;
pub const COMMENT_EMAIL_MAX: usize = 254;

/// Excerpt derived from post content: the first [`EXCERPT_LENGTH`]
/// characters followed by `...` when the content is longer, else the
/// content verbatim.
pub fn derive_excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_LENGTH) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

fn fill_slug(slug: &mut String, source: &str) {
    if slug.trim().is_empty() {
        *slug = slugify(source);
    }
}

pub fn prepare_category(category: &mut Category) {
    fill_slug(&mut category.slug, &category.name);
}

pub fn prepare_tag(tag: &mut Tag) {
    fill_slug(&mut tag.slug, &tag.name);
}

/// Fill a post's derived fields.
///
/// `published_at` is stamped only when the post is published and has never
/// been stamped; an existing value is never overwritten.
pub fn prepare_post(post: &mut Post, now: DateTime<Utc>) {
    fill_slug(&mut post.slug, &post.title);

    if post.status == PostStatus::Published && post.published_at.is_none() {
        post.published_at = Some(now);
    }

    if post.excerpt.trim().is_empty() {
        post.excerpt = derive_excerpt(&post.content);
    }

    post.updated_at = now;
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

fn check_slug(slug: &str, max: usize) -> Result<(), DomainError> {
    require("slug", slug)?;
    max_len("slug", slug, max)?;
    if !is_valid_slug(slug) {
        return Err(DomainError::Validation(format!(
            "slug '{slug}' may only contain letters, digits, hyphens and underscores"
        )));
    }
    Ok(())
}

pub fn validate_category(category: &Category) -> Result<(), DomainError> {
    require("name", &category.name)?;
    max_len("name", &category.name, CATEGORY_NAME_MAX)?;
    check_slug(&category.slug, CATEGORY_NAME_MAX)
}

pub fn validate_tag(tag: &Tag) -> Result<(), DomainError> {
    require("name", &tag.name)?;
    max_len("name", &tag.name, TAG_NAME_MAX)?;
    check_slug(&tag.slug, TAG_NAME_MAX)
}

pub fn validate_post(post: &Post) -> Result<(), DomainError> {
    require("title", &post.title)?;
    max_len("title", &post.title, POST_TITLE_MAX)?;
    require("content", &post.content)?;
    max_len("excerpt", &post.excerpt, POST_EXCERPT_MAX)?;
    if let Some(image) = &post.featured_image {
        max_len("featured_image", image, FEATURED_IMAGE_MAX)?;
    }
    check_slug(&post.slug, POST_TITLE_MAX)
}

pub fn validate_comment(comment: &Comment) -> Result<(), DomainError> {
    require("author_name", &comment.author_name)?;
    max_len("author_name", &comment.author_name, COMMENT_NAME_MAX)?;
    require("author_email", &comment.author_email)?;
    max_len("author_email", &comment.author_email, COMMENT_EMAIL_MAX)?;
    require("content", &comment.content)
}

/// Stricter check applied to comments entered through the admin.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::Validation(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn draft(title: &str, content: &str) -> Post {
        Post::new(Uuid::new_v4(), title.to_string(), content.to_string())
    }

    #[test]
    fn test_excerpt_short_content_is_verbatim() {
        let content = "a".repeat(200);
        assert_eq!(derive_excerpt(&content), content);
    }

    #[test]
    fn test_excerpt_long_content_is_truncated() {
        let content = format!("{}{}", "a".repeat(200), "tail");
        assert_eq!(derive_excerpt(&content), format!("{}...", "a".repeat(200)));
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let content = "ệ".repeat(201);
        let excerpt = derive_excerpt(&content);
        assert_eq!(excerpt.chars().count(), 203);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_prepare_post_fills_slug_and_excerpt() {
        let mut post = draft("Hello World", "short body");
        let now = Utc::now();
        prepare_post(&mut post, now);

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.excerpt, "short body");
        assert_eq!(post.updated_at, now);
        assert_eq!(post.published_at, None);
    }

    #[test]
    fn test_prepare_post_keeps_explicit_values() {
        let mut post = draft("Hello World", "short body");
        post.slug = "custom".to_string();
        post.excerpt = "hand written".to_string();
        prepare_post(&mut post, Utc::now());

        assert_eq!(post.slug, "custom");
        assert_eq!(post.excerpt, "hand written");
    }

    #[test]
    fn test_published_at_is_set_once() {
        let mut post = draft("Title", "body");
        post.status = PostStatus::Published;
        let first = Utc::now();
        prepare_post(&mut post, first);
        assert_eq!(post.published_at, Some(first));

        prepare_post(&mut post, first + Duration::hours(1));
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.updated_at, first + Duration::hours(1));
    }

    #[test]
    fn test_unpublishing_keeps_published_at() {
        let mut post = draft("Title", "body");
        post.status = PostStatus::Published;
        let first = Utc::now();
        prepare_post(&mut post, first);

        post.status = PostStatus::Draft;
        prepare_post(&mut post, first + Duration::minutes(5));
        assert_eq!(post.published_at, Some(first));
    }

    #[test]
    fn test_prepare_category_and_tag() {
        let mut category = Category::new("Data Science".into(), String::new(), String::new());
        prepare_category(&mut category);
        assert_eq!(category.slug, "data-science");

        let mut tag = Tag::new("Machine Learning".into(), "  ".into());
        prepare_tag(&mut tag);
        assert_eq!(tag.slug, "machine-learning");
    }

    #[test]
    fn test_validate_post_limits() {
        let mut post = draft(&"t".repeat(201), "body");
        prepare_post(&mut post, Utc::now());
        assert!(matches!(validate_post(&post), Err(DomainError::Validation(_))));

        let mut post = draft("ok", "body");
        post.excerpt = "e".repeat(301);
        prepare_post(&mut post, Utc::now());
        assert!(validate_post(&post).is_err());

        let mut post = draft("ok", "   ");
        prepare_post(&mut post, Utc::now());
        assert!(validate_post(&post).is_err());
    }

    #[test]
    fn test_validate_rejects_unsluggable_title() {
        let mut post = draft("!!!", "body");
        prepare_post(&mut post, Utc::now());
        assert!(validate_post(&post).is_err());
    }

    #[test]
    fn test_validate_explicit_slug_charset() {
        let mut post = draft("My Post", "body");
        post.slug = "My_Post".to_string();
        prepare_post(&mut post, Utc::now());
        assert!(validate_post(&post).is_ok());

        post.slug = "my post".to_string();
        assert!(matches!(validate_post(&post), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_validate_tag_name_length() {
        let mut tag = Tag::new("x".repeat(51), String::new());
        prepare_tag(&mut tag);
        assert!(validate_tag(&tag).is_err());
    }

    #[test]
    fn test_validate_comment() {
        let comment = Comment::new(
            Uuid::new_v4(),
            "Lan".into(),
            "lan@example.com".into(),
            "Nice".into(),
        );
        assert!(validate_comment(&comment).is_ok());

        let mut missing = comment.clone();
        missing.author_email = " ".into();
        assert!(validate_comment(&missing).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("lan@example.com").is_ok());
        assert!(validate_email("lan@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("plain").is_err());
    }
}
