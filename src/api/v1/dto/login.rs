use serde::{Deserialize, Serialize};

use crate::services::users::LoginOutcome;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        LoginResponse {
            token: outcome.token,
            username: outcome.username,
            name: outcome.name,
        }
    }
}
