//! In-process document store.
//!
//! Backs `DATABASE_URL=memory://` and the test suites. Same observable
//! behavior as the Postgres store: blog ids are ascending integers starting at
//! 1, listings are ordered by id, and reads join the owner.
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{StoreError, StoreResult};
use crate::repos::store::{
    BlogPatch, BlogRecord, DocumentStore, NewBlog, NewUser, Owner, UserRecord,
};

#[derive(Debug, Clone)]
struct StoredBlog {
    id: i64,
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    likes: i64,
    user_id: Uuid,
    comments: Vec<String>,
}

#[derive(Debug, Default)]
struct Inner {
    last_blog_id: i64,
    blogs: BTreeMap<i64, StoredBlog>,
    // insertion order doubles as "createdAt" order
    users: Vec<UserRecord>,
}

impl Inner {
    fn joined(&self, blog: &StoredBlog) -> BlogRecord {
        let owner = self
            .users
            .iter()
            .find(|u| u.id == blog.user_id)
            .map(|u| Owner {
                id: u.id,
                username: u.username.clone(),
                name: u.name.clone(),
            });

        BlogRecord {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
            user_id: blog.user_id,
            owner,
            comments: blog.comments.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_blogs(&self) -> StoreResult<Vec<BlogRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.blogs.values().map(|b| inner.joined(b)).collect())
    }

    async fn find_blog(&self, id: i64) -> StoreResult<Option<BlogRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.blogs.get(&id).map(|b| inner.joined(b)))
    }

    async fn insert_blog(&self, blog: NewBlog) -> StoreResult<BlogRecord> {
        let mut inner = self.inner.write().await;

        inner.last_blog_id += 1;
        let stored = StoredBlog {
            id: inner.last_blog_id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user_id: blog.user_id,
            comments: Vec::new(),
        };
        let record = inner.joined(&stored);
        inner.blogs.insert(stored.id, stored);

        Ok(record)
    }

    async fn update_blog(&self, id: i64, patch: BlogPatch) -> StoreResult<Option<BlogRecord>> {
        let mut inner = self.inner.write().await;

        let Some(blog) = inner.blogs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            blog.title = Some(title);
        }
        if let Some(author) = patch.author {
            blog.author = Some(author);
        }
        if let Some(url) = patch.url {
            blog.url = Some(url);
        }
        if let Some(likes) = patch.likes {
            blog.likes = likes;
        }
        let updated = blog.clone();

        Ok(Some(inner.joined(&updated)))
    }

    async fn push_comment(&self, id: i64, comment: &str) -> StoreResult<Option<BlogRecord>> {
        let mut inner = self.inner.write().await;

        let Some(blog) = inner.blogs.get_mut(&id) else {
            return Ok(None);
        };
        blog.comments.push(comment.to_string());
        let updated = blog.clone();

        Ok(Some(inner.joined(&updated)))
    }

    async fn delete_blog(&self, id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.blogs.remove(&id).is_some())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username"));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            blogs: Vec::new(),
        };
        inner.users.push(record.clone());

        Ok(record)
    }

    async fn link_user_blog(&self, id: Uuid, blog_id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.blogs.push(blog_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unlink_user_blog(&self, id: Uuid, blog_id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.blogs.retain(|b| *b != blog_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            name: Some("Test User".to_string()),
            password_hash: "hash".to_string(),
        }
    }

    fn new_blog(user_id: Uuid, title: &str) -> NewBlog {
        NewBlog {
            title: Some(title.to_string()),
            author: None,
            url: Some("www.example.com".to_string()),
            likes: 0,
            user_id,
        }
    }

    #[tokio::test]
    async fn blog_ids_ascend_and_reads_join_owner() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();

        let first = store.insert_blog(new_blog(user.id, "a")).await.unwrap();
        let second = store.insert_blog(new_blog(user.id, "b")).await.unwrap();
        assert!(second.id > first.id);

        let blogs = store.list_blogs().await.unwrap();
        assert_eq!(blogs.len(), 2);
        assert_eq!(blogs[0].title.as_deref(), Some("a"));
        let owner = blogs[1].owner.as_ref().unwrap();
        assert_eq!(owner.username, "root");
        assert_eq!(owner.name.as_deref(), Some("Test User"));
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();

        let first = store.insert_blog(new_blog(user.id, "a")).await.unwrap();
        assert!(store.delete_blog(first.id).await.unwrap());
        let second = store.insert_blog(new_blog(user.id, "b")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(store.find_blog(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.insert_user(new_user("root")).await.unwrap();

        let err = store.insert_user(new_user("root")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("username")));
    }

    #[tokio::test]
    async fn patch_keeps_omitted_fields() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();
        let blog = store.insert_blog(new_blog(user.id, "a")).await.unwrap();

        let patch = BlogPatch {
            likes: Some(7),
            ..BlogPatch::default()
        };
        let updated = store.update_blog(blog.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.likes, 7);
        assert_eq!(updated.title.as_deref(), Some("a"));
        assert_eq!(updated.url.as_deref(), Some("www.example.com"));
    }

    #[tokio::test]
    async fn writes_to_missing_records_report_absence() {
        let store = MemoryStore::new();

        assert!(store.push_comment(42, "hi").await.unwrap().is_none());
        assert!(
            store
                .update_blog(42, BlogPatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_blog(42).await.unwrap());
        assert!(!store.link_user_blog(Uuid::new_v4(), 1).await.unwrap());
        assert!(!store.unlink_user_blog(Uuid::new_v4(), 1).await.unwrap());
    }

    #[tokio::test]
    async fn link_and_unlink_edit_in_place() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();

        assert!(store.link_user_blog(user.id, 1).await.unwrap());
        assert!(store.link_user_blog(user.id, 2).await.unwrap());
        assert!(store.link_user_blog(user.id, 3).await.unwrap());
        assert!(store.unlink_user_blog(user.id, 2).await.unwrap());

        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.blogs, vec![1, 3]);
    }
}
