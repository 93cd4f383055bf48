use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::repos::error::StoreResult;
use crate::repos::store::{BlogPatch, BlogRecord, DocumentStore, NewBlog, NewUser, UserRecord};
use crate::repos::{blog_repo, user_repo};

/// PostgreSQL-backed document store.
///
/// Thin adapter: the SQL lives in `blog_repo` / `user_repo`.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_blogs(&self) -> StoreResult<Vec<BlogRecord>> {
        blog_repo::list(&self.pool).await
    }

    async fn find_blog(&self, id: i64) -> StoreResult<Option<BlogRecord>> {
        blog_repo::get(&self.pool, id).await
    }

    async fn insert_blog(&self, blog: NewBlog) -> StoreResult<BlogRecord> {
        blog_repo::create(&self.pool, &blog).await
    }

    async fn update_blog(&self, id: i64, patch: BlogPatch) -> StoreResult<Option<BlogRecord>> {
        blog_repo::update(&self.pool, id, &patch).await
    }

    async fn push_comment(&self, id: i64, comment: &str) -> StoreResult<Option<BlogRecord>> {
        blog_repo::push_comment(&self.pool, id, comment).await
    }

    async fn delete_blog(&self, id: i64) -> StoreResult<bool> {
        blog_repo::delete(&self.pool, id).await
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        user_repo::list(&self.pool).await
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        user_repo::get(&self.pool, id).await
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        user_repo::get_by_username(&self.pool, username).await
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        user_repo::create(&self.pool, &user).await
    }

    async fn link_user_blog(&self, id: Uuid, blog_id: i64) -> StoreResult<bool> {
        user_repo::link_blog(&self.pool, id, blog_id).await
    }

    async fn unlink_user_blog(&self, id: Uuid, blog_id: i64) -> StoreResult<bool> {
        user_repo::unlink_blog(&self.pool, id, blog_id).await
    }
}
