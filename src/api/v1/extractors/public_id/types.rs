/**
 * Responsibility
 *  - Declare a typed public id per resource
 *
 * Everything `pub` here is re-exported through ./mod.rs
 */
use super::core::{PublicId, RawPublicId};

// blogs
pub enum BlogTag {}
pub type PublicBlogId = PublicId<BlogTag>;
pub type RawBlogId = RawPublicId<BlogTag>;
