use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - visitor feedback attached to a single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
}

impl Comment {
    /// Create a new, unapproved comment.
    pub fn new(post_id: Uuid, author_name: String, author_email: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_name,
            author_email,
            content,
            created_at: Utc::now(),
            is_approved: false,
        }
    }

    pub fn approved(mut self) -> Self {
        self.is_approved = true;
        self
    }
}

/// Administrative input for a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    pub post_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    #[serde(default)]
    pub is_approved: bool,
}

/// Fields submitted through the public comment form on a post page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentSubmission {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub content: String,
}
