use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - free-form label attached to any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
        }
    }

    pub fn absolute_url(&self) -> String {
        format!("/tag/{}/", self.slug)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A tag annotated with its number of published posts.
#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub tag: Tag,
    pub post_count: u64,
}
