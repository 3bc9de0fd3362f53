//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate slug for {entity_type}: {slug}")]
    DuplicateSlug {
        entity_type: &'static str,
        slug: String,
    },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Referenced entity does not exist: {0}")]
    ForeignKey(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    /// Map a failed write of `entity_type` to a domain error.
    ///
    /// Unique violations on a slug constraint become [`DomainError::DuplicateSlug`].
    pub fn from_write(entity_type: &'static str, slug: &str, err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation { constraint } if constraint.contains("slug") => {
                Self::DuplicateSlug {
                    entity_type,
                    slug: slug.to_string(),
                }
            }
            RepoError::UniqueViolation { constraint } => {
                Self::Duplicate(format!("{entity_type} violates {constraint}"))
            }
            RepoError::ForeignKeyViolation { constraint } => {
                Self::ForeignKey(format!("{entity_type} violates {constraint}"))
            }
            RepoError::NotFound => Self::not_found(entity_type, slug),
            other => other.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found("record", ""),
            RepoError::UniqueViolation { constraint } => Self::Duplicate(constraint),
            RepoError::ForeignKeyViolation { constraint } => Self::ForeignKey(constraint),
            RepoError::Connection(msg) | RepoError::Query(msg) => Self::Internal(msg),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },
}

impl RepoError {
    pub fn unique(constraint: impl Into<String>) -> Self {
        Self::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        Self::ForeignKeyViolation {
            constraint: constraint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_constraint_maps_to_duplicate_slug() {
        let err = DomainError::from_write("Post", "hello", RepoError::unique("posts_slug_key"));
        assert!(matches!(
            err,
            DomainError::DuplicateSlug { entity_type: "Post", ref slug } if slug == "hello"
        ));
    }

    #[test]
    fn test_other_unique_constraint_maps_to_duplicate() {
        let err =
            DomainError::from_write("Category", "rust", RepoError::unique("categories_name_key"));
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn test_foreign_key_maps_to_foreign_key() {
        let err = DomainError::from_write(
            "Post",
            "hello",
            RepoError::foreign_key("posts_author_id_fkey"),
        );
        assert!(matches!(err, DomainError::ForeignKey(_)));
    }
}
