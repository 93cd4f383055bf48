pub mod factory;
pub mod password;
pub mod token;

pub use factory::build_auth_service;
pub use token::{AuthService, TokenError, TokenVerifier, VerifiedToken};
