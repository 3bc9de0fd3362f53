//! Public read side: listings, detail pages, search and navigation.
//!
//! Everything here only sees published posts.

use std::cmp::Reverse;

use crate::domain::{Category, CategoryCount, Comment, Post, PostStatus, Tag, TagCount};
use crate::error::DomainError;
use crate::ports::{CommentFilter, Page, PostFilter};

use super::pagination::{Paginated, resolve_page};
use super::repositories::Repositories;

/// Sizes used by the public queries.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub posts_per_page: u64,
    pub related_posts: u64,
    pub popular_tags: usize,
    pub recent_posts: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            related_posts: 3,
            popular_tags: 10,
            recent_posts: 5,
        }
    }
}

/// Case-insensitive ordering key, falling back to the exact name.
fn name_key(name: &str) -> (String, String) {
    (name.to_lowercase(), name.to_owned())
}

/// Which published posts a listing page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Published,
    Category(String),
    Tag(String),
    Search(String),
}

/// A resolved listing page.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub category: Option<Category>,
    pub tag: Option<Tag>,
    pub query: Option<String>,
    pub posts: Paginated<Post>,
}

/// Everything the post detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub related: Vec<Post>,
}

/// Site-wide navigation widgets.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    pub categories: Vec<CategoryCount>,
    pub popular_tags: Vec<TagCount>,
    pub recent_posts: Vec<Post>,
}

#[derive(Clone)]
pub struct BlogQueries {
    repos: Repositories,
    config: QueryConfig,
}

impl BlogQueries {
    pub fn new(repos: Repositories, config: QueryConfig) -> Self {
        Self { repos, config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub async fn list_published(&self, page: Page) -> Result<Vec<Post>, DomainError> {
        Ok(self.repos.posts.list(&PostFilter::published(), page).await?)
    }

    /// Fetch a published post by slug and count the view.
    ///
    /// The counter is a read-modify-write without locking; concurrent
    /// fetches may lose increments.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        let mut post = self.published_post(slug).await?;
        post.views += 1;
        self.repos.posts.set_views(post.id, post.views).await?;
        tracing::debug!(post_id = %post.id, views = post.views, "Post viewed");
        Ok(post)
    }

    pub async fn list_by_category(&self, slug: &str, page: Page) -> Result<Vec<Post>, DomainError> {
        let category = self.category(slug).await?;
        let filter = PostFilter::published().in_category(category.id);
        Ok(self.repos.posts.list(&filter, page).await?)
    }

    pub async fn list_by_tag(&self, slug: &str, page: Page) -> Result<Vec<Post>, DomainError> {
        let tag = self.tag(slug).await?;
        let filter = PostFilter::published().with_tag(tag.id);
        Ok(self.repos.posts.list(&filter, page).await?)
    }

    /// Case-insensitive search over title, content and excerpt.
    /// A blank query matches nothing.
    pub async fn search(&self, query: &str, page: Page) -> Result<Vec<Post>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let filter = PostFilter::published().matching(query);
        Ok(self.repos.posts.list(&filter, page).await?)
    }

    /// Other published posts in the same category.
    pub async fn related_posts(&self, post: &Post, limit: u64) -> Result<Vec<Post>, DomainError> {
        let Some(category_id) = post.category_id else {
            return Ok(Vec::new());
        };
        let filter = PostFilter::published()
            .in_category(category_id)
            .excluding(post.id);
        Ok(self.repos.posts.list(&filter, Page::first(limit)).await?)
    }

    /// Navigation widgets, recomputed on every call.
    pub async fn navigation_context(&self) -> Result<NavigationContext, DomainError> {
        let mut categories: Vec<CategoryCount> = self
            .repos
            .categories
            .with_post_counts(PostStatus::Published)
            .await?
            .into_iter()
            .filter(|c| c.post_count > 0)
            .collect();
        categories.sort_by_cached_key(|c| name_key(&c.category.name));

        let mut popular_tags: Vec<TagCount> = self
            .repos
            .tags
            .with_post_counts(PostStatus::Published)
            .await?
            .into_iter()
            .filter(|t| t.post_count > 0)
            .collect();
        popular_tags.sort_by_cached_key(|t| (Reverse(t.post_count), name_key(&t.tag.name)));
        popular_tags.truncate(self.config.popular_tags);

        let recent_posts = self
            .list_published(Page::first(self.config.recent_posts))
            .await?;

        Ok(NavigationContext {
            categories,
            popular_tags,
            recent_posts,
        })
    }

    /// Resolve a paginated listing from a raw `?page=` value.
    pub async fn listing(
        &self,
        listing: Listing,
        raw_page: Option<&str>,
    ) -> Result<ListingPage, DomainError> {
        let per_page = self.config.posts_per_page.max(1);
        let mut page = ListingPage {
            category: None,
            tag: None,
            query: None,
            posts: Paginated::empty(per_page),
        };

        let filter = match listing {
            Listing::Published => PostFilter::published(),
            Listing::Category(slug) => {
                let category = self.category(&slug).await?;
                let filter = PostFilter::published().in_category(category.id);
                page.category = Some(category);
                filter
            }
            Listing::Tag(slug) => {
                let tag = self.tag(&slug).await?;
                let filter = PostFilter::published().with_tag(tag.id);
                page.tag = Some(tag);
                filter
            }
            Listing::Search(query) => {
                let query = query.trim().to_string();
                if query.is_empty() {
                    return Ok(page);
                }
                page.query = Some(query.clone());
                PostFilter::published().matching(query)
            }
        };

        let total = self.repos.posts.count(&filter).await?;
        let number = resolve_page(raw_page, total, per_page);
        let items = self
            .repos
            .posts
            .list(&filter, Page::number(number, per_page))
            .await?;

        page.posts = Paginated {
            items,
            number,
            per_page,
            total,
        };
        Ok(page)
    }

    /// Detail page: counts a view, then gathers tags, approved comments
    /// (newest first) and related posts.
    pub async fn post_detail(&self, slug: &str) -> Result<PostDetail, DomainError> {
        let post = self.get_by_slug(slug).await?;

        let category = match post.category_id {
            Some(id) => self.repos.categories.find_by_id(id).await?,
            None => None,
        };
        let tags = self.repos.tags.list_for_post(post.id).await?;
        let comments = self
            .repos
            .comments
            .list(&CommentFilter {
                post_id: Some(post.id),
                is_approved: Some(true),
                text: None,
            })
            .await?;
        let related = self
            .related_posts(&post, self.config.related_posts)
            .await?;

        Ok(PostDetail {
            post,
            category,
            tags,
            comments,
            related,
        })
    }

    async fn published_post(&self, slug: &str) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_slug(slug)
            .await?
            .filter(Post::is_published)
            .ok_or_else(|| DomainError::not_found("Post", slug))
    }

    async fn category(&self, slug: &str) -> Result<Category, DomainError> {
        self.repos
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", slug))
    }

    async fn tag(&self, slug: &str) -> Result<Tag, DomainError> {
        self.repos
            .tags
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", slug))
    }
}
