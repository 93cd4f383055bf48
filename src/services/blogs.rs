//! Blog access control.
//!
//! Decides whether a blog operation is allowed, performs it against the
//! document store and hands back the owner-joined record.
//!
//! Rules:
//! - listing, reading, commenting and updating need no token
//! - creating needs a token whose subject resolves to an existing user
//! - deleting additionally needs the acting user to own the blog; a stranger's
//!   valid token is answered exactly like a bad token (`Unauthorized`)
//!
//! Create (insert blog, then link it to the owner) and delete (unlink, then
//! delete) are two separate writes with no transaction around them. If the
//! second write fails the error is logged and returned, and the first write
//! stays in place. Links are appended/removed by the store itself, so
//! overlapping writes for one user never drop each other's links.
use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::repos::error::StoreResult;
use crate::repos::store::{BlogPatch, BlogRecord, DocumentStore, NewBlog, UserRecord};
use crate::services::auth::TokenVerifier;

/// Fields accepted when creating a blog.
#[derive(Debug, Clone, Default)]
pub struct BlogDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl BlogDraft {
    // Only rejects when *both* title and url are missing.
    fn validate(&self) -> Result<(), AppError> {
        if is_blank(self.title.as_deref()) && is_blank(self.url.as_deref()) {
            return Err(AppError::validation(
                "blog validation failed: title or url is required",
            ));
        }
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn DocumentStore>,
    tokens: Arc<dyn TokenVerifier>,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: Arc<dyn TokenVerifier>) -> Self {
        Self { store, tokens }
    }

    pub async fn list(&self) -> Result<Vec<BlogRecord>, AppError> {
        Ok(self.store.list_blogs().await?)
    }

    pub async fn get(&self, id: i64) -> Result<BlogRecord, AppError> {
        self.store.find_blog(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        token: Option<&str>,
        draft: BlogDraft,
    ) -> Result<BlogRecord, AppError> {
        draft.validate()?;
        let user = self.authenticate(token).await?;

        let blog = self
            .store
            .insert_blog(NewBlog {
                title: draft.title,
                author: draft.author,
                url: draft.url,
                likes: draft.likes.unwrap_or(0),
                user_id: user.id,
            })
            .await?;

        let linked = self.store.link_user_blog(user.id, blog.id).await;
        Self::check_link(linked, user.id, blog.id)?;

        tracing::info!(blog_id = blog.id, user_id = %user.id, "blog created");
        Ok(blog)
    }

    pub async fn add_comment(&self, id: i64, comment: &str) -> Result<BlogRecord, AppError> {
        self.store
            .push_comment(id, comment)
            .await?
            .ok_or(AppError::NotFound)
    }

    // Anyone may update any blog.
    pub async fn update(&self, id: i64, patch: BlogPatch) -> Result<BlogRecord, AppError> {
        self.store
            .update_blog(id, patch)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Deletes a blog owned by `user` (see [`BlogService::authenticate`]).
    pub async fn delete(&self, user: &UserRecord, id: i64) -> Result<(), AppError> {
        // Existence first: the ownership comparison needs the blog.
        let blog = self.store.find_blog(id).await?.ok_or(AppError::NotFound)?;

        if blog.user_id != user.id {
            tracing::warn!(
                blog_id = id,
                user_id = %user.id,
                owner_id = %blog.user_id,
                "delete refused: caller does not own the blog"
            );
            return Err(AppError::Unauthorized);
        }

        let unlinked = self.store.unlink_user_blog(user.id, id).await;
        Self::check_link(unlinked, user.id, id)?;

        if !self.store.delete_blog(id).await? {
            // Removed by a concurrent request between the lookup and here.
            return Err(AppError::NotFound);
        }

        tracing::info!(blog_id = id, user_id = %user.id, "blog deleted");
        Ok(())
    }

    /// Token -> acting user. Every failure is `Unauthorized`.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<UserRecord, AppError> {
        let token = token.ok_or(AppError::Unauthorized)?;
        let verified = self.tokens.verify(token)?;
        tracing::debug!(user_id = %verified.user_id, username = %verified.username, "token accepted");

        self.store
            .find_user(verified.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %verified.user_id, "token subject does not exist");
                AppError::Unauthorized
            })
    }

    fn check_link(
        result: StoreResult<bool>,
        user_id: Uuid,
        blog_id: i64,
    ) -> Result<(), AppError> {
        match result {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::error!(blog_id, user_id = %user_id, "owner vanished while updating blog links");
                Err(AppError::Internal)
            }
            Err(err) => {
                tracing::error!(blog_id, user_id = %user_id, error = %err, "failed to update owner blog links");
                Err(err.into())
            }
        }
    }
}
