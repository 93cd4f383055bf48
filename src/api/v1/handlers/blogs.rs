/*
 * Responsibility
 * - /blogs handlers
 * - {id} arrives as a public id; the extractor decodes it to the internal id
 * - the bearer token is passed through as-is; BlogService decides who may do what
 * - bodies go through ApiJson so decode failures use the AppError envelope
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::blogs::{BlogResponse, CommentRequest, CreateBlogRequest, UpdateBlogRequest},
        extractors::{ApiJson, BearerToken, PublicBlogId, RawBlogId},
    },
    error::AppError,
    repos::store::BlogRecord,
    state::AppState,
};

fn to_response(state: &AppState, record: BlogRecord) -> Result<BlogResponse, AppError> {
    Ok(BlogResponse::from_record(&state.id_codec, record)?)
}

pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogResponse>>, AppError> {
    let records = state.blogs.list().await?;

    let mut res = Vec::with_capacity(records.len());
    for record in records {
        res.push(to_response(&state, record)?);
    }

    Ok(Json(res))
}

pub async fn get_blog(
    State(state): State<AppState>,
    blog_id: PublicBlogId,
) -> Result<Json<BlogResponse>, AppError> {
    let record = state.blogs.get(blog_id.id).await?;
    Ok(Json(to_response(&state, record)?))
}

pub async fn create_blog(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(req): ApiJson<CreateBlogRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    let record = state.blogs.create(token.as_deref(), req.into()).await?;
    Ok(Json(to_response(&state, record)?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    blog_id: PublicBlogId,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    let comment = req.validate().map_err(AppError::validation)?;

    let record = state.blogs.add_comment(blog_id.id, comment).await?;
    Ok(Json(to_response(&state, record)?))
}

pub async fn update_blog(
    State(state): State<AppState>,
    blog_id: PublicBlogId,
    ApiJson(req): ApiJson<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, AppError> {
    let record = state.blogs.update(blog_id.id, req.into()).await?;
    Ok(Json(to_response(&state, record)?))
}

pub async fn delete_blog(
    State(state): State<AppState>,
    token: BearerToken,
    blog_id: RawBlogId,
) -> Result<StatusCode, AppError> {
    // caller before id: a bad token wins over a malformed id
    let user = state.blogs.authenticate(token.as_deref()).await?;
    let blog_id = blog_id.decode(&state.id_codec)?;

    state.blogs.delete(&user, blog_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
