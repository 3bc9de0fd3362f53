//! Domain to page-context conversions.

use inkwell_core::domain::{Category, CategoryCount, Comment, Post, Tag, TagCount};
use inkwell_core::services::{ListingPage, NavigationContext, Paginated, PostDetail};
use inkwell_shared::dto::{
    CategoryLink, CommentView, ListingBody, Navigation, PageInfo, PostDetailBody, PostSummary,
    PostView, TagLink,
};

pub fn category_link(category: &Category) -> CategoryLink {
    CategoryLink {
        name: category.name.clone(),
        slug: category.slug.clone(),
        url: category.absolute_url(),
        description: Some(category.description.clone()).filter(|d| !d.is_empty()),
        post_count: None,
    }
}

pub fn tag_link(tag: &Tag) -> TagLink {
    TagLink {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
        url: tag.absolute_url(),
        post_count: None,
    }
}

pub fn post_summary(post: &Post) -> PostSummary {
    PostSummary {
        title: post.title.clone(),
        slug: post.slug.clone(),
        url: post.absolute_url(),
        excerpt: post.excerpt.clone(),
        featured_image: post.featured_image.clone(),
        published_at: post.published_at,
        views: post.views,
    }
}

fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        author_name: comment.author_name,
        content: comment.content,
        created_at: comment.created_at,
    }
}

pub fn navigation(nav: &NavigationContext) -> Navigation {
    Navigation {
        categories: nav
            .categories
            .iter()
            .map(|CategoryCount { category, post_count }| CategoryLink {
                post_count: Some(*post_count),
                ..category_link(category)
            })
            .collect(),
        popular_tags: nav
            .popular_tags
            .iter()
            .map(|TagCount { tag, post_count }| TagLink {
                post_count: Some(*post_count),
                ..tag_link(tag)
            })
            .collect(),
        recent_posts: nav.recent_posts.iter().map(post_summary).collect(),
    }
}

fn page_info<T>(page: &Paginated<T>) -> PageInfo {
    PageInfo {
        number: page.number,
        num_pages: page.num_pages(),
        total: page.total,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }
}

pub fn listing_body(listing: &ListingPage) -> ListingBody {
    ListingBody {
        category: listing.category.as_ref().map(category_link),
        tag: listing.tag.as_ref().map(tag_link),
        query: listing.query.clone(),
        posts: listing.posts.items.iter().map(post_summary).collect(),
        page: page_info(&listing.posts),
    }
}

pub fn detail_body(detail: PostDetail) -> PostDetailBody {
    let PostDetail {
        post,
        category,
        tags,
        comments,
        related,
    } = detail;

    PostDetailBody {
        post: PostView {
            title: post.title.clone(),
            slug: post.slug.clone(),
            url: post.absolute_url(),
            excerpt: post.excerpt,
            content: post.content,
            featured_image: post.featured_image,
            views: post.views,
            published_at: post.published_at,
            updated_at: post.updated_at,
            category: category.as_ref().map(category_link),
            tags: tags.iter().map(tag_link).collect(),
        },
        comments: comments.into_iter().map(comment_view).collect(),
        related_posts: related.iter().map(post_summary).collect(),
    }
}
