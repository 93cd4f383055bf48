//! Registration, user listing and login.
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::repos::store::{BlogRecord, DocumentStore, NewUser, UserRecord};
use crate::services::auth::AuthService;
use crate::services::auth::password::{self, DUMMY_PASSWORD_HASH};

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

/// A user with the blogs it links to, in link order.
#[derive(Debug, Clone)]
pub struct UserWithBlogs {
    pub user: UserRecord,
    pub blogs: Vec<BlogRecord>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<AuthService>) -> Self {
        Self { store, auth }
    }

    pub async fn register(&self, registration: Registration) -> Result<UserRecord, AppError> {
        let Registration {
            username,
            name,
            password,
        } = registration;

        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AppError::Internal
            })?;

        let user = self
            .store
            .insert_user(NewUser {
                username,
                name,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<UserWithBlogs>, AppError> {
        let users = self.store.list_users().await?;
        let mut blogs: HashMap<i64, BlogRecord> = self
            .store
            .list_blogs()
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        // Links to blogs that no longer exist are skipped.
        let res = users
            .into_iter()
            .map(|user| {
                let owned = user.blogs.iter().filter_map(|id| blogs.remove(id)).collect();
                UserWithBlogs { user, blogs: owned }
            })
            .collect();

        Ok(res)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self.store.find_user_by_username(username).await?;

        let expected = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DUMMY_PASSWORD_HASH.to_string());
        let candidate = password.to_string();

        let matches =
            tokio::task::spawn_blocking(move || password::verify_password(&expected, &candidate))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "password verification task failed");
                    AppError::Internal
                })?;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                tracing::info!(username, "login failed");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.auth.issue(user.id, &user.username)?;

        Ok(LoginOutcome {
            token,
            username: user.username,
            name: user.name,
        })
    }
}
