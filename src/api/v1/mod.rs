/*
 * Responsibility
 * - v1 public surface (re-export of routes())
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

#[cfg(test)]
mod tests;

pub use routes::routes;
