/*
 * Responsibility
 * - persistence layer: the DocumentStore contract and its backends
 */
pub mod blog_repo;
pub mod error;
pub mod memory_store;
pub mod pg_store;
pub mod store;
pub mod user_repo;

pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
pub use store::DocumentStore;
