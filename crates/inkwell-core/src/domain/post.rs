use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post. Only published posts are publicly visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - represents a blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new draft post. Derived fields are filled in by
    /// [`crate::rules::prepare_post`] before the post is stored.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug: String::new(),
            author_id,
            category_id: None,
            excerpt: String::new(),
            content,
            featured_image: None,
            status: PostStatus::Draft,
            views: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn absolute_url(&self) -> String {
        format!("/post/{}/", self.slug)
    }

    /// Copy the editable fields of `input` onto this post.
    ///
    /// Author, view count and `created_at` (unless supplied) are kept.
    /// `published_at` only changes when the input sets it explicitly.
    pub fn apply(&mut self, input: &PostInput) {
        self.title = input.title.clone();
        self.slug = input.slug.as_deref().map(str::trim).unwrap_or_default().to_string();
        self.category_id = input.category_id;
        self.excerpt = input.excerpt.clone().unwrap_or_default();
        self.content = input.content.clone();
        self.featured_image = input
            .featured_image
            .clone()
            .filter(|image| !image.trim().is_empty());
        self.status = input.status;
        if let Some(created_at) = input.created_at {
            self.created_at = created_at;
        }
        if input.published_at.is_some() {
            self.published_at = input.published_at;
        }
    }
}

/// Administrative input for creating or replacing a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        assert_eq!("published".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert_eq!(PostStatus::Draft.to_string(), "draft");
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_apply_keeps_published_at_unless_given() {
        let mut post = Post::new(Uuid::new_v4(), "Old".into(), "body".into());
        let stamp = Utc::now();
        post.published_at = Some(stamp);
        post.views = 7;

        post.apply(&PostInput {
            title: "New".into(),
            content: "new body".into(),
            status: PostStatus::Published,
            ..Default::default()
        });

        assert_eq!(post.title, "New");
        assert_eq!(post.published_at, Some(stamp));
        assert_eq!(post.views, 7);
    }
}
