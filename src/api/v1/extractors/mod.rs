/*
 * Responsibility
 * - request extractors shared by the v1 handlers
 */
mod bearer;
mod json;
mod public_id;

pub use bearer::BearerToken;
pub use json::ApiJson;
pub use public_id::*;
