/**
 * Responsibility
 *  - Bundle core and types
 *  - Control what handlers get to see
 */
mod core;
mod types;

pub use types::*;
