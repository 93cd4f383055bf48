use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::login::{LoginRequest, LoginResponse},
        extractors::ApiJson,
    },
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state.users.login(&req.username, &req.password).await?;
    Ok(Json(outcome.into()))
}
