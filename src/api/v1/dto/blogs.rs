/*
 * Responsibility
 * - Blogs request/response DTOs
 * - Blog ids go out encoded (never leak the internal id)
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::store::{BlogPatch, BlogRecord, Owner};
use crate::services::blogs::BlogDraft;
use crate::services::id_codec::{self, IdCodec};

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl From<CreateBlogRequest> for BlogDraft {
    fn from(req: CreateBlogRequest) -> Self {
        BlogDraft {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl From<UpdateBlogRequest> for BlogPatch {
    fn from(req: UpdateBlogRequest) -> Self {
        BlogPatch {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<&str, &'static str> {
        match self.comment.as_deref() {
            Some(c) if !c.trim().is_empty() => Ok(c),
            _ => Err("comment is required"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

impl From<Owner> for OwnerResponse {
    fn from(owner: Owner) -> Self {
        OwnerResponse {
            id: owner.id,
            username: owner.username,
            name: owner.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: String, // encoded
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: i64,
    pub user: Option<OwnerResponse>,
    pub comments: Vec<CommentResponse>,
}

impl BlogResponse {
    pub fn from_record(codec: &IdCodec, record: BlogRecord) -> id_codec::Result<Self> {
        Ok(BlogResponse {
            id: codec.encode(record.id)?,
            title: record.title,
            author: record.author,
            url: record.url,
            likes: record.likes,
            user: record.owner.map(OwnerResponse::from),
            comments: record
                .comments
                .into_iter()
                .map(|comment| CommentResponse { comment })
                .collect(),
        })
    }
}
