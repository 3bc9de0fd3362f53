use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use inkwell_core::domain::{
    CategoryInput, CommentInput, CommentSubmission, PostInput, PostStatus, TagInput, User,
};
use inkwell_core::ports::{CommentFilter, Page, PostFilter};
use inkwell_core::services::{Listing, SubmissionOutcome};
use inkwell_core::slug::slugify;
use inkwell_core::{BlogQueries, ContentStore, DomainError, QueryConfig, Repositories};

use super::InMemoryStore;

struct Blog {
    store: ContentStore,
    queries: BlogQueries,
    author: User,
}

async fn blog() -> Blog {
    let repos = Repositories::from_store(Arc::new(InMemoryStore::new()));
    let author = User::new(
        "hien".to_string(),
        "hien@example.com".to_string(),
        "hash".to_string(),
    )
    .staff();
    repos.users.insert(author.clone()).await.unwrap();

    Blog {
        store: ContentStore::new(repos.clone()),
        queries: BlogQueries::new(
            repos,
            QueryConfig {
                posts_per_page: 2,
                ..QueryConfig::default()
            },
        ),
        author,
    }
}

fn post(title: &str, content: &str, status: PostStatus) -> PostInput {
    PostInput {
        title: title.to_string(),
        content: content.to_string(),
        status,
        ..PostInput::default()
    }
}

fn category(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        ..CategoryInput::default()
    }
}

fn tag(name: &str) -> TagInput {
    TagInput {
        name: name.to_string(),
        slug: None,
    }
}

fn submission(name: &str, email: &str, content: &str) -> CommentSubmission {
    CommentSubmission {
        author_name: name.to_string(),
        author_email: email.to_string(),
        content: content.to_string(),
    }
}

impl Blog {
    async fn publish(&self, title: &str, content: &str) -> inkwell_core::domain::Post {
        self.store
            .create_post(self.author.id, post(title, content, PostStatus::Published))
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_missing_slugs_are_derived() {
    let blog = blog().await;

    let c = blog.store.create_category(category("Data Science")).await.unwrap();
    let t = blog.store.create_tag(tag("Machine Learning")).await.unwrap();
    let p = blog.publish("Hello Rust World", "body").await;

    assert_eq!(c.slug, slugify("Data Science"));
    assert_eq!(t.slug, slugify("Machine Learning"));
    assert_eq!(p.slug, slugify("Hello Rust World"));
}

#[tokio::test]
async fn test_published_at_is_set_exactly_once() {
    let blog = blog().await;
    let input = post("Stable", "body", PostStatus::Published);
    let created = blog
        .store
        .create_post(blog.author.id, input.clone())
        .await
        .unwrap();
    let first = created.published_at.expect("published post has a timestamp");

    let again = blog.store.update_post(created.id, input.clone()).await.unwrap();
    let third = blog.store.update_post(created.id, input).await.unwrap();

    assert_eq!(again.published_at, Some(first));
    assert_eq!(third.published_at, Some(first));
    assert!(third.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_publishing_a_draft_stamps_published_at() {
    let blog = blog().await;
    let draft = blog
        .store
        .create_post(blog.author.id, post("Later", "body", PostStatus::Draft))
        .await
        .unwrap();
    assert_eq!(draft.published_at, None);

    let published = blog
        .store
        .update_post(draft.id, post("Later", "body", PostStatus::Published))
        .await
        .unwrap();
    assert!(published.published_at.is_some());
}

#[tokio::test]
async fn test_explicit_published_at_overrides() {
    let blog = blog().await;
    let created = blog.publish("Backdated", "body").await;
    let backdate = Utc::now() - Duration::days(30);

    let edited = blog
        .store
        .update_post(
            created.id,
            PostInput {
                published_at: Some(backdate),
                ..post("Backdated", "body", PostStatus::Published)
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.published_at, Some(backdate));
}

#[tokio::test]
async fn test_excerpt_derivation_boundary() {
    let blog = blog().await;
    let long = "x".repeat(250);
    let exact = "y".repeat(200);

    let long_post = blog.publish("Long", &long).await;
    let exact_post = blog.publish("Exact", &exact).await;

    assert_eq!(long_post.excerpt, format!("{}...", &long[..200]));
    assert_eq!(exact_post.excerpt, exact);
}

#[tokio::test]
async fn test_detail_fetch_counts_views() {
    let blog = blog().await;
    let created = blog.publish("Counted", "body").await;

    for _ in 0..4 {
        blog.queries.get_by_slug(&created.slug).await.unwrap();
    }

    let stored = blog.store.get_post(created.id).await.unwrap();
    assert_eq!(stored.views, 4);
    assert_eq!(stored.updated_at, created.updated_at);
}

#[tokio::test]
async fn test_drafts_are_not_publicly_visible() {
    let blog = blog().await;
    let draft = blog
        .store
        .create_post(blog.author.id, post("Hidden", "hello", PostStatus::Draft))
        .await
        .unwrap();

    let err = blog.queries.get_by_slug(&draft.slug).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    assert!(blog.queries.list_published(Page::first(10)).await.unwrap().is_empty());
    assert!(blog.queries.search("hello", Page::first(10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search() {
    let blog = blog().await;
    let hit = blog.publish("Greeting", "hello world").await;
    blog.publish("Other", "nothing to see").await;

    assert!(blog.queries.search("", Page::first(10)).await.unwrap().is_empty());
    assert!(blog.queries.search("   ", Page::first(10)).await.unwrap().is_empty());
    assert!(blog.queries.search("xyz", Page::first(10)).await.unwrap().is_empty());

    let found = blog.queries.search("Hello", Page::first(10)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, hit.id);

    let by_title = blog.queries.search("greet", Page::first(10)).await.unwrap();
    assert_eq!(by_title.len(), 1);
}

#[tokio::test]
async fn test_deleting_category_keeps_posts() {
    let blog = blog().await;
    let c = blog.store.create_category(category("Notes")).await.unwrap();
    let mut ids = Vec::new();
    for title in ["One", "Two"] {
        let input = PostInput {
            category_id: Some(c.id),
            ..post(title, "body", PostStatus::Published)
        };
        ids.push(blog.store.create_post(blog.author.id, input).await.unwrap().id);
    }

    blog.store.delete_category(c.id).await.unwrap();

    for id in ids {
        let p = blog.store.get_post(id).await.unwrap();
        assert_eq!(p.category_id, None);
    }
}

#[tokio::test]
async fn test_deleting_post_cascades_to_comments() {
    let blog = blog().await;
    let p = blog.publish("Discussed", "body").await;
    for i in 0..3 {
        blog.store
            .create_comment(CommentInput {
                post_id: p.id,
                author_name: format!("Reader {i}"),
                author_email: format!("reader{i}@example.com"),
                content: "Nice".to_string(),
                is_approved: false,
            })
            .await
            .unwrap();
    }
    let all = CommentFilter::default();
    assert_eq!(blog.store.list_comments(&all).await.unwrap().len(), 3);

    blog.store.delete_post(p.id).await.unwrap();

    assert!(blog.store.list_comments(&all).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_tag_only_removes_association() {
    let blog = blog().await;
    let t = blog.store.create_tag(tag("rust")).await.unwrap();
    let input = PostInput {
        tag_ids: vec![t.id],
        ..post("Tagged", "body", PostStatus::Published)
    };
    let p = blog.store.create_post(blog.author.id, input).await.unwrap();
    assert_eq!(blog.store.post_tags(p.id).await.unwrap().len(), 1);

    blog.store.delete_tag(t.id).await.unwrap();

    assert!(blog.store.get_post(p.id).await.is_ok());
    assert!(blog.store.post_tags(p.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_comment_submission_is_ignored() {
    let blog = blog().await;
    let p = blog.publish("Open", "body").await;

    let outcome = blog
        .store
        .submit_comment(&p.slug, submission("Lan", "   ", "Hi"))
        .await
        .unwrap();

    assert_eq!(outcome, SubmissionOutcome::Ignored);
    assert!(blog.store.list_comments(&CommentFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_public_comment_is_approved_and_admin_comment_is_not() {
    let blog = blog().await;
    let p = blog.publish("Open", "body").await;

    let outcome = blog
        .store
        .submit_comment(&p.slug, submission("  Lan ", "lan@example.com", " Hi "))
        .await
        .unwrap();
    let SubmissionOutcome::Created(public) = outcome else {
        panic!("expected a stored comment");
    };
    assert!(public.is_approved);
    assert_eq!(public.author_name, "Lan");
    assert_eq!(public.content, "Hi");

    let admin = blog
        .store
        .create_comment(CommentInput {
            post_id: p.id,
            author_name: "Admin".to_string(),
            author_email: "admin@example.com".to_string(),
            content: "Pending".to_string(),
            is_approved: false,
        })
        .await
        .unwrap();
    assert!(!admin.is_approved);

    let detail = blog.queries.post_detail(&p.slug).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].id, public.id);
}

#[tokio::test]
async fn test_comment_on_draft_is_not_found() {
    let blog = blog().await;
    let draft = blog
        .store
        .create_post(blog.author.id, post("Draft", "body", PostStatus::Draft))
        .await
        .unwrap();

    let err = blog
        .store
        .submit_comment(&draft.slug, submission("Lan", "lan@example.com", "Hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_bulk_approval() {
    let blog = blog().await;
    let p = blog.publish("Moderated", "body").await;
    let mut ids = Vec::new();
    for i in 0..3 {
        let c = blog
            .store
            .create_comment(CommentInput {
                post_id: p.id,
                author_name: format!("R{i}"),
                author_email: "r@example.com".to_string(),
                content: "text".to_string(),
                is_approved: false,
            })
            .await
            .unwrap();
        ids.push(c.id);
    }

    let approved = blog
        .store
        .approve_comments(&[ids[0], ids[1], Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(approved, 2);

    let pending = CommentFilter {
        is_approved: Some(false),
        ..CommentFilter::default()
    };
    assert_eq!(blog.store.list_comments(&pending).await.unwrap().len(), 1);

    let disapproved = blog.store.disapprove_comments(&ids).await.unwrap();
    assert_eq!(disapproved, 3);
    assert_eq!(blog.store.list_comments(&pending).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_navigation_context() {
    let blog = blog().await;
    let zebra = blog.store.create_category(category("Zebra")).await.unwrap();
    let alpha = blog.store.create_category(category("Alpha")).await.unwrap();
    let drafts = blog.store.create_category(category("Drafts only")).await.unwrap();
    blog.store.create_category(category("Empty")).await.unwrap();
    let popular = blog.store.create_tag(tag("popular")).await.unwrap();
    let rare = blog.store.create_tag(tag("rare")).await.unwrap();
    let hidden = blog.store.create_tag(tag("hidden")).await.unwrap();

    for (i, (category_id, tag_ids)) in [
        (zebra.id, vec![popular.id, rare.id]),
        (alpha.id, vec![popular.id]),
        (alpha.id, vec![popular.id]),
    ]
    .into_iter()
    .enumerate()
    {
        let input = PostInput {
            category_id: Some(category_id),
            tag_ids,
            ..post(&format!("Post {i}"), "body", PostStatus::Published)
        };
        blog.store.create_post(blog.author.id, input).await.unwrap();
    }
    let input = PostInput {
        category_id: Some(drafts.id),
        tag_ids: vec![hidden.id],
        ..post("Unfinished", "body", PostStatus::Draft)
    };
    blog.store.create_post(blog.author.id, input).await.unwrap();

    let nav = blog.queries.navigation_context().await.unwrap();

    let names: Vec<_> = nav.categories.iter().map(|c| c.category.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Zebra"]);
    assert_eq!(nav.categories[0].post_count, 2);

    let tags: Vec<_> = nav
        .popular_tags
        .iter()
        .map(|t| (t.tag.name.as_str(), t.post_count))
        .collect();
    assert_eq!(tags, [("popular", 3), ("rare", 1)]);

    assert_eq!(nav.recent_posts.len(), 3);
    assert!(nav.recent_posts.iter().all(|p| p.is_published()));
}

#[tokio::test]
async fn test_listing_order_and_pagination() {
    let blog = blog().await;
    let now = Utc::now();
    for (title, days_ago) in [("Old", 3), ("Newest", 0), ("Middle", 1)] {
        let input = PostInput {
            published_at: Some(now - Duration::days(days_ago)),
            ..post(title, "body", PostStatus::Published)
        };
        blog.store.create_post(blog.author.id, input).await.unwrap();
    }

    let all = blog.queries.list_published(Page::first(10)).await.unwrap();
    let titles: Vec<_> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Newest", "Middle", "Old"]);

    let page = blog.queries.listing(Listing::Published, Some("2")).await.unwrap();
    assert_eq!(page.posts.number, 2);
    assert_eq!(page.posts.total, 3);
    assert_eq!(page.posts.items.len(), 1);
    assert_eq!(page.posts.items[0].title, "Old");

    let clamped = blog.queries.listing(Listing::Published, Some("99")).await.unwrap();
    assert_eq!(clamped.posts.number, 2);

    let fallback = blog.queries.listing(Listing::Published, Some("abc")).await.unwrap();
    assert_eq!(fallback.posts.number, 1);
}

#[tokio::test]
async fn test_category_and_tag_listings() {
    let blog = blog().await;
    let c = blog.store.create_category(category("Guides")).await.unwrap();
    let t = blog.store.create_tag(tag("howto")).await.unwrap();
    let input = PostInput {
        category_id: Some(c.id),
        tag_ids: vec![t.id],
        ..post("Guide", "body", PostStatus::Published)
    };
    let guide = blog.store.create_post(blog.author.id, input).await.unwrap();
    blog.publish("Unrelated", "body").await;

    let by_category = blog.queries.list_by_category("guides", Page::first(10)).await.unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].id, guide.id);

    let by_tag = blog.queries.list_by_tag("howto", Page::first(10)).await.unwrap();
    assert_eq!(by_tag.len(), 1);

    let listing = blog
        .queries
        .listing(Listing::Tag("howto".to_string()), None)
        .await
        .unwrap();
    assert_eq!(listing.tag.map(|t| t.id), Some(t.id));

    let missing = blog.queries.list_by_category("nope", Page::first(10)).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_related_posts() {
    let blog = blog().await;
    let c = blog.store.create_category(category("Series")).await.unwrap();
    let mut posts = Vec::new();
    for i in 0..5 {
        let input = PostInput {
            category_id: Some(c.id),
            ..post(&format!("Part {i}"), "body", PostStatus::Published)
        };
        posts.push(blog.store.create_post(blog.author.id, input).await.unwrap());
    }
    let loner = blog.publish("Loner", "body").await;

    let related = blog.queries.related_posts(&posts[0], 3).await.unwrap();
    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|p| p.id != posts[0].id));

    assert!(blog.queries.related_posts(&loner, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slug_collision_fails() {
    let blog = blog().await;
    blog.publish("Same Title", "body").await;

    let err = blog
        .store
        .create_post(blog.author.id, post("Same Title", "other", PostStatus::Draft))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateSlug { .. }));

    blog.store.create_category(category("Rust")).await.unwrap();
    let err = blog
        .store
        .create_category(CategoryInput {
            name: "Rust".to_string(),
            slug: Some("rust-lang".to_string()),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let blog = blog().await;

    let err = blog
        .store
        .create_post(Uuid::new_v4(), post("Orphan", "body", PostStatus::Draft))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ForeignKey(_)));

    let err = blog
        .store
        .create_post(
            blog.author.id,
            PostInput {
                tag_ids: vec![Uuid::new_v4()],
                ..post("Bad tag", "body", PostStatus::Draft)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ForeignKey(_)));

    let err = blog
        .store
        .create_comment(CommentInput {
            post_id: Uuid::new_v4(),
            author_name: "Lan".to_string(),
            author_email: "lan@example.com".to_string(),
            content: "Hi".to_string(),
            is_approved: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ForeignKey(_)));
}

#[tokio::test]
async fn test_navigation_limits_popular_tags_and_recent_posts() {
    let blog = blog().await;
    let mut tags = Vec::new();
    for i in 0..12 {
        tags.push(blog.store.create_tag(tag(&format!("tag-{i:02}"))).await.unwrap());
    }
    let now = Utc::now();

    for i in 0..7 {
        let tag_ids = match i {
            0 => tags.iter().map(|t| t.id).collect(),
            1 => vec![tags[11].id],
            _ => Vec::new(),
        };
        let input = PostInput {
            tag_ids,
            published_at: Some(now - Duration::hours(i)),
            ..post(&format!("Post {i}"), "body", PostStatus::Published)
        };
        blog.store.create_post(blog.author.id, input).await.unwrap();
    }

    let nav = blog.queries.navigation_context().await.unwrap();

    assert_eq!(nav.popular_tags.len(), 10);
    assert_eq!(nav.popular_tags[0].tag.name, "tag-11");
    assert_eq!(nav.popular_tags[0].post_count, 2);
    let ties: Vec<_> = nav.popular_tags[1..]
        .iter()
        .map(|t| t.tag.name.as_str())
        .collect();
    assert_eq!(
        ties,
        ["tag-00", "tag-01", "tag-02", "tag-03", "tag-04", "tag-05", "tag-06", "tag-07", "tag-08"]
    );

    let recent: Vec<_> = nav.recent_posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(recent, ["Post 0", "Post 1", "Post 2", "Post 3", "Post 4"]);
}

#[tokio::test]
async fn test_navigation_categories_ignore_case() {
    let blog = blog().await;
    for name in ["Banana", "apple", "Cherry"] {
        let c = blog.store.create_category(category(name)).await.unwrap();
        let input = PostInput {
            category_id: Some(c.id),
            ..post(&format!("About {name}"), "body", PostStatus::Published)
        };
        blog.store.create_post(blog.author.id, input).await.unwrap();
    }

    let nav = blog.queries.navigation_context().await.unwrap();
    let names: Vec<_> = nav.categories.iter().map(|c| c.category.name.as_str()).collect();
    assert_eq!(names, ["apple", "Banana", "Cherry"]);
}

#[tokio::test]
async fn test_admin_post_filters() {
    let blog = blog().await;
    let rust = blog.store.create_tag(tag("rust")).await.unwrap();
    blog.publish("Live", "body").await;
    let input = PostInput {
        tag_ids: vec![rust.id],
        ..post("Pending", "body", PostStatus::Draft)
    };
    blog.store.create_post(blog.author.id, input).await.unwrap();

    let drafts = PostFilter {
        status: Some(PostStatus::Draft),
        ..PostFilter::default()
    };
    let found = blog.store.list_posts(&drafts, Page::first(10)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Pending");
    assert_eq!(blog.store.count_posts(&PostFilter::default()).await.unwrap(), 2);

    let tagged = PostFilter::default().with_tag(rust.id);
    assert_eq!(blog.store.count_posts(&tagged).await.unwrap(), 1);
    let found = blog.store.list_posts(&tagged, Page::first(10)).await.unwrap();
    assert_eq!(found[0].title, "Pending");
}

#[tokio::test]
async fn test_usernames_and_emails_are_unique() {
    let blog = blog().await;
    let users = &blog.store.repositories().users;

    let same_name = User::new(
        "hien".to_string(),
        "other@example.com".to_string(),
        "hash".to_string(),
    );
    let err = users.insert(same_name).await.unwrap_err();
    assert!(matches!(
        err,
        inkwell_core::RepoError::UniqueViolation { ref constraint } if constraint == "users_username_key"
    ));

    let same_email = User::new(
        "other".to_string(),
        "hien@example.com".to_string(),
        "hash".to_string(),
    );
    let err = users.insert(same_email).await.unwrap_err();
    assert!(matches!(
        err,
        inkwell_core::RepoError::UniqueViolation { ref constraint } if constraint == "users_email_key"
    ));
}
