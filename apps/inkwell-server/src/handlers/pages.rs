//! Public site pages.
//!
//! Every page is a JSON page context carrying the site name, a title and
//! the navigation widgets next to its own body.

use actix_web::{HttpResponse, http::header, web};
use serde::{Deserialize, Serialize};

use inkwell_core::domain::CommentSubmission;
use inkwell_core::services::{Listing, SubmissionOutcome};
use inkwell_shared::dto::{AboutBody, PageContext};

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// `?page=` is kept raw so non-numeric values fall back to the first page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

async fn render<T: Serialize>(state: &AppState, title: String, body: T) -> AppResult<HttpResponse> {
    let navigation = state.queries.navigation_context().await?;

    Ok(HttpResponse::Ok().json(PageContext {
        site_name: state.site_name.clone(),
        title,
        navigation: views::navigation(&navigation),
        body,
    }))
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .queries
        .listing(Listing::Published, query.page.as_deref())
        .await?;
    render(&state, state.site_name.clone(), views::listing_body(&listing)).await
}

/// GET /post/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let detail = state.queries.post_detail(&path).await?;
    let title = detail.post.title.clone();
    render(&state, title, views::detail_body(detail)).await
}

/// POST /post/{slug}/
///
/// Redirects back to the post whether or not the comment was stored.
pub async fn submit_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<CommentSubmission>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    match state.content.submit_comment(&slug, form.into_inner()).await? {
        SubmissionOutcome::Created(comment) => {
            tracing::debug!(comment_id = %comment.id, %slug, "Comment accepted");
        }
        SubmissionOutcome::Ignored => {
            tracing::debug!(%slug, "Comment form incomplete");
        }
    }

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/post/{slug}/")))
        .finish())
}

/// GET /category/{slug}/
pub async fn category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .queries
        .listing(Listing::Category(path.into_inner()), query.page.as_deref())
        .await?;
    let title = listing
        .category
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    render(&state, title, views::listing_body(&listing)).await
}

/// GET /tag/{slug}/
pub async fn tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .queries
        .listing(Listing::Tag(path.into_inner()), query.page.as_deref())
        .await?;
    let title = listing
        .tag
        .as_ref()
        .map(|t| format!("Posts tagged {}", t.name))
        .unwrap_or_default();
    render(&state, title, views::listing_body(&listing)).await
}

/// GET /search/?q=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let SearchQuery { q, page } = query.into_inner();
    let q = q.unwrap_or_default();
    let listing = state
        .queries
        .listing(Listing::Search(q.clone()), page.as_deref())
        .await?;
    let title = match q.trim() {
        "" => "Search".to_string(),
        q => format!("Search results for \"{q}\""),
    };
    render(&state, title, views::listing_body(&listing)).await
}

/// GET /about/
pub async fn about(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    render(&state, "About".to_string(), AboutBody::default()).await
}
