//! In-memory content store - used when no database is configured.
//!
//! Emulates the relational schema: unique constraints, foreign keys and
//! cascade rules are checked here the way Postgres would check them, and
//! violations are reported with Postgres-style constraint names.
//! Note: Data is lost on process restart.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Category, CategoryCount, Comment, Post, PostStatus, Tag, TagCount, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, CategoryRepository, CommentFilter, CommentRepository, Page, PostFilter,
    PostRepository, TagRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    tags: HashMap<Uuid, Tag>,
    posts: HashMap<Uuid, Post>,
    /// (post_id, tag_id)
    post_tags: BTreeSet<(Uuid, Uuid)>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn check_user(&self, user: &User) -> Result<(), RepoError> {
        if self
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::unique("users_username_key"));
        }
        if self
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::unique("users_email_key"));
        }
        Ok(())
    }

    fn check_category(&self, category: &Category) -> Result<(), RepoError> {
        for other in self.categories.values().filter(|c| c.id != category.id) {
            if other.name == category.name {
                return Err(RepoError::unique("categories_name_key"));
            }
            if other.slug == category.slug {
                return Err(RepoError::unique("categories_slug_key"));
            }
        }
        Ok(())
    }

    fn check_tag(&self, tag: &Tag) -> Result<(), RepoError> {
        for other in self.tags.values().filter(|t| t.id != tag.id) {
            if other.name == tag.name {
                return Err(RepoError::unique("tags_name_key"));
            }
            if other.slug == tag.slug {
                return Err(RepoError::unique("tags_slug_key"));
            }
        }
        Ok(())
    }

    fn check_post(&self, post: &Post) -> Result<(), RepoError> {
        if self
            .posts
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug)
        {
            return Err(RepoError::unique("posts_slug_key"));
        }
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::foreign_key("posts_author_id_fkey"));
        }
        if let Some(category_id) = post.category_id
            && !self.categories.contains_key(&category_id)
        {
            return Err(RepoError::foreign_key("posts_category_id_fkey"));
        }
        Ok(())
    }

    fn check_comment(&self, comment: &Comment) -> Result<(), RepoError> {
        if !self.posts.contains_key(&comment.post_id) {
            return Err(RepoError::foreign_key("comments_post_id_fkey"));
        }
        Ok(())
    }

    fn remove_post(&mut self, post_id: Uuid) -> Option<Post> {
        let post = self.posts.remove(&post_id)?;
        self.comments.retain(|_, c| c.post_id != post_id);
        self.post_tags.retain(|(p, _)| *p != post_id);
        Some(post)
    }

    fn tag_ids_of(&self, post_id: Uuid) -> impl Iterator<Item = Uuid> + '_ {
        self.post_tags
            .range((post_id, Uuid::nil())..=(post_id, Uuid::from_u128(u128::MAX)))
            .map(|(_, tag_id)| *tag_id)
    }

    fn post_matches(&self, post: &Post, filter: &PostFilter) -> bool {
        if filter.status.is_some_and(|status| post.status != status) {
            return false;
        }
        if filter.category_id.is_some() && post.category_id != filter.category_id {
            return false;
        }
        if filter.exclude_id == Some(post.id) {
            return false;
        }
        if let Some(tag_id) = filter.tag_id
            && !self.post_tags.contains(&(post.id, tag_id))
        {
            return false;
        }
        if let Some(text) = &filter.text {
            let needle = text.to_lowercase();
            return [&post.title, &post.content, &post.excerpt]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        }
        true
    }

    fn filtered_posts(&self, filter: &PostFilter) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|post| self.post_matches(post, filter))
            .collect();
        posts.sort_by(|a, b| listing_order(a, b));
        posts
    }
}

/// `published_at` descending with nulls last, then `created_at` descending.
fn listing_order(a: &Post, b: &Post) -> Ordering {
    let published = match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    published
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn window<T: Clone>(items: Vec<&T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).cloned().collect()
}

/// Content store backed by hash maps behind an async `RwLock`.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---- users ----

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::unique("users_pkey"));
        }
        tables.check_user(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_user(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        let authored: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in authored {
            tables.remove_post(post_id);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

// ---- categories ----

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.contains_key(&category.id) {
            return Err(RepoError::unique("categories_pkey"));
        }
        tables.check_category(&category)?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_category(&category)?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| {
                search.is_none_or(|s| contains_ci(&c.name, s) || contains_ci(&c.description, s))
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn with_post_counts(
        &self,
        status: PostStatus,
    ) -> Result<Vec<CategoryCount>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for post in tables.posts.values().filter(|p| p.status == status) {
            if let Some(category_id) = post.category_id {
                *counts.entry(category_id).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .filter_map(|(id, post_count)| {
                tables.categories.get(&id).map(|category| CategoryCount {
                    category: category.clone(),
                    post_count,
                })
            })
            .collect())
    }
}

// ---- tags ----

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn insert(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.contains_key(&tag.id) {
            return Err(RepoError::unique("tags_pkey"));
        }
        tables.check_tag(&tag)?;
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.tags.contains_key(&tag.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_tag(&tag)?;
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.tags.remove(&id).ok_or(RepoError::NotFound)?;
        tables.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .values()
            .filter(|t| search.is_none_or(|s| contains_ci(&t.name, s)))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tag_ids_of(post_id)
            .filter_map(|id| tables.tags.get(&id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn with_post_counts(&self, status: PostStatus) -> Result<Vec<TagCount>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for (post_id, tag_id) in &tables.post_tags {
            if tables.posts.get(post_id).is_some_and(|p| p.status == status) {
                *counts.entry(*tag_id).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .filter_map(|(id, post_count)| {
                tables.tags.get(&id).map(|tag| TagCount {
                    tag: tag.clone(),
                    post_count,
                })
            })
            .collect())
    }
}

// ---- posts ----

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::unique("posts_pkey"));
        }
        tables.check_post(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_post(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.remove_post(id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, filter: &PostFilter, page: Page) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(window(tables.filtered_posts(filter), page))
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.filtered_posts(filter).len() as u64)
    }

    async fn set_views(&self, post_id: Uuid, views: u64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        post.views = views;
        Ok(())
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(RepoError::foreign_key("post_tags_post_id_fkey"));
        }
        if tag_ids.iter().any(|id| !tables.tags.contains_key(id)) {
            return Err(RepoError::foreign_key("post_tags_tag_id_fkey"));
        }
        tables.post_tags.retain(|(p, _)| *p != post_id);
        tables
            .post_tags
            .extend(tag_ids.iter().map(|tag_id| (post_id, *tag_id)));
        Ok(())
    }
}

// ---- comments ----

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.contains_key(&comment.id) {
            return Err(RepoError::unique("comments_pkey"));
        }
        tables.check_comment(&comment)?;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_comment(&comment)?;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| filter.post_id.is_none_or(|id| c.post_id == id))
            .filter(|c| filter.is_approved.is_none_or(|a| c.is_approved == a))
            .filter(|c| {
                filter.text.as_deref().is_none_or(|s| {
                    contains_ci(&c.author_name, s)
                        || contains_ci(&c.author_email, s)
                        || contains_ci(&c.content, s)
                })
            })
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn set_approval(&self, ids: &[Uuid], approved: bool) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let mut updated = 0;
        for id in ids.iter().collect::<BTreeSet<_>>() {
            if let Some(comment) = tables.comments.get_mut(id) {
                comment.is_approved = approved;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
