/*
 * Responsibility
 * - /users handlers (register, list)
 * - users keep their UUID on the wire (no encoding)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::users::{CreateUserRequest, UserResponse},
        extractors::ApiJson,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let listings = state.users.list().await?;

    let mut res = Vec::with_capacity(listings.len());
    for listing in listings {
        res.push(UserResponse::from_listing(&state.id_codec, listing)?);
    }

    Ok(Json(res))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let user = state.users.register(req.into_registration()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::registered(user))))
}
