/*
 * Responsibility
 * - Take the path segment as a public id and decode it to the internal id
 * - Failure becomes AppError::InvalidId (400 "malformatted id")
 * - RawPublicId defers the decode to the handler
 *
 * Keeps out
 * - concrete resource names (those live in types.rs)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

#[derive(Clone, Copy)]
pub struct PublicId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PublicId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<T> FromRequestParts<AppState> for PublicId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = RawPublicId::<T>::from_request_parts(parts, state).await?;
        raw.decode(&state.id_codec)
    }
}

/// The undecoded path segment, for handlers that must check something else
/// (e.g. the caller) before the id is allowed to fail.
pub struct RawPublicId<T> {
    raw: String,
    _marker: PhantomData<T>,
}

impl<T> RawPublicId<T> {
    pub fn decode(&self, codec: &IdCodec) -> Result<PublicId<T>, AppError> {
        Ok(PublicId::new(codec.decode(&self.raw)?))
    }
}

impl<T> FromRequestParts<AppState> for RawPublicId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidId)?;
        Ok(Self {
            raw,
            _marker: PhantomData,
        })
    }
}

impl<T> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId").field("id", &self.id).finish()
    }
}
