//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, NullOrdering, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use inkwell_core::Repositories;
use inkwell_core::domain::{Category, CategoryCount, Comment, Post, PostStatus, Tag, TagCount, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    CategoryRepository, CommentFilter, CommentRepository, Page, PostFilter, PostRepository,
    TagRepository, UserRepository,
};

use super::entity::{category, comment, post, post_tag, tag, user};
use super::postgres_base::{PostgresBaseRepository, repo_err};

pub type PostgresUserRepository = PostgresBaseRepository<user::Entity>;
pub type PostgresCategoryRepository = PostgresBaseRepository<category::Entity>;
pub type PostgresTagRepository = PostgresBaseRepository<tag::Entity>;
pub type PostgresPostRepository = PostgresBaseRepository<post::Entity>;
pub type PostgresCommentRepository = PostgresBaseRepository<comment::Entity>;

/// Build the full repository set over one connection pool.
pub fn postgres_repositories(db: DbConn) -> Repositories {
    let db = Arc::new(db);
    Repositories {
        users: Arc::new(PostgresUserRepository::shared(Arc::clone(&db))),
        categories: Arc::new(PostgresCategoryRepository::shared(Arc::clone(&db))),
        tags: Arc::new(PostgresTagRepository::shared(Arc::clone(&db))),
        posts: Arc::new(PostgresPostRepository::shared(Arc::clone(&db))),
        comments: Arc::new(PostgresCommentRepository::shared(db)),
    }
}

/// `%text%` with LIKE wildcards escaped, lowercased for `lower(col) LIKE`.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn lower_like<C: ColumnTrait>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

fn as_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Category>, RepoError> {
        let mut query = category::Entity::find();
        if let Some(text) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(text);
            query = query.filter(
                Condition::any()
                    .add(lower_like(category::Column::Name, &pattern))
                    .add(lower_like(category::Column::Description, &pattern)),
            );
        }
        let result = query
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn with_post_counts(
        &self,
        status: PostStatus,
    ) -> Result<Vec<CategoryCount>, RepoError> {
        let counts: HashMap<Uuid, i64> = post::Entity::find()
            .select_only()
            .column(post::Column::CategoryId)
            .column_as(Expr::col((post::Entity, post::Column::Id)).count(), "post_count")
            .filter(post::Column::Status.eq(post::Status::from(status)))
            .filter(post::Column::CategoryId.is_not_null())
            .group_by(post::Column::CategoryId)
            .into_tuple::<(Uuid, i64)>()
            .all(&*self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .collect();
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let categories = category::Entity::find()
            .filter(category::Column::Id.is_in(counts.keys().copied()))
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(categories
            .into_iter()
            .map(|model| CategoryCount {
                post_count: as_count(counts.get(&model.id).copied().unwrap_or_default()),
                category: model.into(),
            })
            .collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Tag>, RepoError> {
        let mut query = tag::Entity::find();
        if let Some(text) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(lower_like(tag::Column::Name, &like_pattern(text)));
        }
        let result = query
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let result = tag::Entity::find()
            .inner_join(post_tag::Entity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn with_post_counts(&self, status: PostStatus) -> Result<Vec<TagCount>, RepoError> {
        let counts: HashMap<Uuid, i64> = post_tag::Entity::find()
            .select_only()
            .column(post_tag::Column::TagId)
            .column_as(
                Expr::col((post_tag::Entity, post_tag::Column::PostId)).count(),
                "post_count",
            )
            .inner_join(post::Entity)
            .filter(post::Column::Status.eq(post::Status::from(status)))
            .group_by(post_tag::Column::TagId)
            .into_tuple::<(Uuid, i64)>()
            .all(&*self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .collect();
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let tags = tag::Entity::find()
            .filter(tag::Column::Id.is_in(counts.keys().copied()))
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;

        Ok(tags
            .into_iter()
            .map(|model| TagCount {
                post_count: as_count(counts.get(&model.id).copied().unwrap_or_default()),
                tag: model.into(),
            })
            .collect())
    }
}

/// Apply a [`PostFilter`] to a posts query.
fn filtered_posts(filter: &PostFilter) -> Select<post::Entity> {
    let mut query = post::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(post::Column::Status.eq(post::Status::from(status)));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(tag_id) = filter.tag_id {
        query = query.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(post_tag::Entity)
                    .and_where(post_tag::Column::TagId.eq(tag_id))
                    .to_owned(),
            ),
        );
    }
    if let Some(exclude_id) = filter.exclude_id {
        query = query.filter(post::Column::Id.ne(exclude_id));
    }
    if let Some(text) = filter.text.as_deref() {
        let pattern = like_pattern(text);
        query = query.filter(
            Condition::any()
                .add(lower_like(post::Column::Title, &pattern))
                .add(lower_like(post::Column::Content, &pattern))
                .add(lower_like(post::Column::Excerpt, &pattern)),
        );
    }
    query
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: &PostFilter, page: Page) -> Result<Vec<Post>, RepoError> {
        let result = filtered_posts(filter)
            .order_by_with_nulls(post::Column::PublishedAt, Order::Desc, NullOrdering::Last)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        filtered_posts(filter).count(&*self.db).await.map_err(repo_err)
    }

    async fn set_views(&self, post_id: Uuid, views: u64) -> Result<(), RepoError> {
        let result = post::Entity::update_many()
            .col_expr(
                post::Column::Views,
                Expr::value(i64::try_from(views).unwrap_or(i64::MAX)),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(&*self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tag_ids = tag_ids.to_vec();
        tag_ids.sort_unstable();
        tag_ids.dedup();

        let txn = self.db.begin().await.map_err(repo_err)?;
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;
        if !tag_ids.is_empty() {
            let rows = tag_ids.into_iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(tag_id),
            });
            post_tag::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(repo_err)?;
        }
        txn.commit().await.map_err(repo_err)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let mut query = comment::Entity::find();
        if let Some(post_id) = filter.post_id {
            query = query.filter(comment::Column::PostId.eq(post_id));
        }
        if let Some(approved) = filter.is_approved {
            query = query.filter(comment::Column::IsApproved.eq(approved));
        }
        if let Some(text) = filter.text.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(text);
            query = query.filter(
                Condition::any()
                    .add(lower_like(comment::Column::AuthorName, &pattern))
                    .add(lower_like(comment::Column::AuthorEmail, &pattern))
                    .add(lower_like(comment::Column::Content, &pattern)),
            );
        }
        let result = query
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_approval(&self, ids: &[Uuid], approved: bool) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = comment::Entity::update_many()
            .col_expr(comment::Column::IsApproved, Expr::value(approved))
            .filter(comment::Column::Id.is_in(ids.iter().copied()))
            .exec(&*self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Hello"), "%hello%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("admin@example.com"), "a***@example.com");
        assert_eq!(mask_email("nobody"), "***");
    }
}
