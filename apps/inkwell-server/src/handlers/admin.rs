//! Admin API: CRUD over the content model and comment moderation.
//!
//! Every handler requires an [`AdminIdentity`].

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::{CategoryInput, CommentInput, PostInput, PostStatus, TagInput};
use inkwell_core::ports::{CommentFilter, Page, PostFilter};
use inkwell_core::services::Paginated;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{AdminListQuery, BulkIdsRequest, BulkUpdateResponse, TagIdsRequest};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const ADMIN_PAGE_SIZE: u64 = 50;

fn search_text(query: &AdminListQuery) -> Option<&str> {
    query.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
}

// ---- categories ----

pub async fn list_categories(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> AppResult<HttpResponse> {
    let categories = state.content.list_categories(search_text(&query)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

pub async fn create_category(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state.content.create_category(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(category)))
}

pub async fn get_category(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state.content.get_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

pub async fn update_category(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state
        .content
        .update_category(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

pub async fn delete_category(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.content.delete_category(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- tags ----

pub async fn list_tags(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> AppResult<HttpResponse> {
    let tags = state.content.list_tags(search_text(&query)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tags)))
}

pub async fn create_tag(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<TagInput>,
) -> AppResult<HttpResponse> {
    let tag = state.content.create_tag(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(tag)))
}

pub async fn get_tag(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let tag = state.content.get_tag(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tag)))
}

pub async fn update_tag(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<TagInput>,
) -> AppResult<HttpResponse> {
    let tag = state
        .content
        .update_tag(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tag)))
}

pub async fn delete_tag(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.content.delete_tag(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- posts ----

/// GET /admin/posts?q=&status=&category=&tag=&page=
pub async fn list_posts(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> AppResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<PostStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let filter = PostFilter {
        status,
        category_id: query.category,
        tag_id: query.tag,
        text: search_text(&query).map(str::to_string),
        ..PostFilter::default()
    };
    let number = query.page.unwrap_or(1).max(1);

    let total = state.content.count_posts(&filter).await?;
    let items = state
        .content
        .list_posts(&filter, Page::number(number, ADMIN_PAGE_SIZE))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        number,
        per_page: ADMIN_PAGE_SIZE,
        total,
    })))
}

/// POST /admin/posts; the signed-in admin becomes the author.
pub async fn create_post(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let post = state
        .content
        .create_post(admin.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

pub async fn get_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.content.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

pub async fn update_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostInput>,
) -> AppResult<HttpResponse> {
    let post = state
        .content
        .update_post(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

pub async fn delete_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.content.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /admin/posts/{id}/tags
pub async fn set_post_tags(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<TagIdsRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.content.set_post_tags(post_id, &body.tag_ids).await?;
    let tags = state.content.post_tags(post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tags)))
}

// ---- comments ----

/// GET /admin/comments?post=&approved=&q=
pub async fn list_comments(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    query: web::Query<AdminListQuery>,
) -> AppResult<HttpResponse> {
    let filter = CommentFilter {
        post_id: query.post,
        is_approved: query.approved,
        text: search_text(&query).map(str::to_string),
    };
    let comments = state.content.list_comments(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}

pub async fn create_comment(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let comment = state.content.create_comment(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

pub async fn get_comment(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state.content.get_comment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

pub async fn update_comment(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let comment = state
        .content
        .update_comment(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

pub async fn delete_comment(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.content.delete_comment(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/comments/approve
pub async fn approve_comments(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<BulkIdsRequest>,
) -> AppResult<HttpResponse> {
    let updated = state.content.approve_comments(&body.ids).await?;
    tracing::info!(admin = %admin.username, updated, "Comments approved");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        BulkUpdateResponse { updated },
        format!("{updated} comment(s) approved"),
    )))
}

/// POST /admin/comments/disapprove
pub async fn disapprove_comments(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<BulkIdsRequest>,
) -> AppResult<HttpResponse> {
    let updated = state.content.disapprove_comments(&body.ids).await?;
    tracing::info!(admin = %admin.username, updated, "Comments disapproved");
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        BulkUpdateResponse { updated },
        format!("{updated} comment(s) disapproved"),
    )))
}
