//! Document store interface used by the blog and user services.
//!
//! Two collections live behind it: blogs and users. Blog reads always come back
//! with the owning user's `username`/`name` joined in (`BlogRecord::owner`).
use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::StoreResult;

/// Owner fields joined into a blog read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRecord {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: i64,
    pub user_id: Uuid,
    // None when the referenced user row is gone
    pub owner: Option<Owner>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: i64,
    pub user_id: Uuid,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub blogs: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// CRUD over the `blogs` and `users` collections.
///
/// Every method is a single write or read; callers that need several steps
/// (create blog + link it to its owner) issue them one after another.
/// List edits happen inside the store so concurrent callers never overwrite
/// each other's entries.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn list_blogs(&self) -> StoreResult<Vec<BlogRecord>>;

    async fn find_blog(&self, id: i64) -> StoreResult<Option<BlogRecord>>;

    async fn insert_blog(&self, blog: NewBlog) -> StoreResult<BlogRecord>;

    async fn update_blog(&self, id: i64, patch: BlogPatch) -> StoreResult<Option<BlogRecord>>;

    // Appends to the comment list. Returns None if the blog does not exist.
    async fn push_comment(&self, id: i64, comment: &str) -> StoreResult<Option<BlogRecord>>;

    async fn delete_blog(&self, id: i64) -> StoreResult<bool>;

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    // Fails with `StoreError::Conflict("username")` when the username is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord>;

    // Appends `blog_id` to the user's back-reference list in one write.
    // Returns false if the user does not exist.
    async fn link_user_blog(&self, id: Uuid, blog_id: i64) -> StoreResult<bool>;

    // Removes every occurrence of `blog_id` from the user's list in one write.
    async fn unlink_user_blog(&self, id: Uuid, blog_id: i64) -> StoreResult<bool>;
}
