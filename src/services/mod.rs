/*
 * Responsibility
 * - business rules sitting between handlers and the store
 */
pub mod auth;
pub mod blogs;
pub mod id_codec;
pub mod users;
