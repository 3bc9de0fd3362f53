use std::sync::Arc;

use crate::ports::{
    CategoryRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};

/// The set of repositories backing the content store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    /// Use a single store that implements every repository.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + CategoryRepository
            + TagRepository
            + PostRepository
            + CommentRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            categories: store.clone(),
            tags: store.clone(),
            posts: store.clone(),
            comments: store,
        }
    }
}
