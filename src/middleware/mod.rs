/*
 * Responsibility
 * - router-level middleware, applied once in app::build_router
 */
pub mod cors;
pub mod http;
pub mod security_headers;

pub use http::HttpLimits;
