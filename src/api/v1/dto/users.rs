/*
 * Responsibility
 * - Users request/response DTOs
 * - validate() does the shape checks before anything is hashed or stored
 * - the password hash never appears in a response
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::store::{BlogRecord, UserRecord};
use crate::services::id_codec::{self, IdCodec};
use crate::services::users::{Registration, UserWithBlogs};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.username.as_deref() {
            None => return Err("username is required"),
            Some(u) if u.chars().count() < MIN_USERNAME_LEN => {
                return Err("username must be at least 3 characters long");
            }
            Some(_) => {}
        }
        match self.password.as_deref() {
            None => return Err("password is required"),
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                return Err("password must be at least 3 characters long");
            }
            Some(_) => {}
        }

        Ok(())
    }

    pub fn into_registration(self) -> Registration {
        Registration {
            username: self.username.unwrap_or_default(),
            name: self.name,
            password: self.password.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserBlogResponse {
    pub id: String, // encoded
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: i64,
}

impl UserBlogResponse {
    fn from_record(codec: &IdCodec, blog: BlogRecord) -> id_codec::Result<Self> {
        Ok(UserBlogResponse {
            id: codec.encode(blog.id)?,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<UserBlogResponse>,
}

impl UserResponse {
    pub fn from_listing(codec: &IdCodec, listing: UserWithBlogs) -> id_codec::Result<Self> {
        let blogs = listing
            .blogs
            .into_iter()
            .map(|b| UserBlogResponse::from_record(codec, b))
            .collect::<id_codec::Result<Vec<_>>>()?;

        Ok(UserResponse {
            id: listing.user.id,
            username: listing.user.username,
            name: listing.user.name,
            blogs,
        })
    }

    // Freshly registered users own nothing yet.
    pub fn registered(user: UserRecord) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            name: user.name,
            blogs: Vec::new(),
        }
    }
}
