/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (services hold Arcs inside)
 */
use std::sync::Arc;

use crate::repos::DocumentStore;
use crate::services::auth::AuthService;
use crate::services::{blogs::BlogService, id_codec::IdCodec, users::UserService};

#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
    pub users: UserService,
    pub id_codec: IdCodec,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<AuthService>, id_codec: IdCodec) -> Self {
        Self {
            blogs: BlogService::new(store.clone(), auth.clone()),
            users: UserService::new(store, auth),
            id_codec,
        }
    }
}
