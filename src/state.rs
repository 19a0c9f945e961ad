/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - validator: identity-provider token validation
 *   - sessions: read-only session lookup
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::services::{auth::TokenValidator, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<dyn TokenValidator>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(validator: Arc<dyn TokenValidator>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            validator,
            sessions,
        }
    }
}
