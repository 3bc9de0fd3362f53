use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - groups posts under a single heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description,
            created_at: Utc::now(),
        }
    }

    /// Public listing path for this category.
    pub fn absolute_url(&self) -> String {
        format!("/category/{}/", self.slug)
    }
}

/// Administrative input for creating or replacing a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A category annotated with its number of published posts.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: Category,
    pub post_count: u64,
}
