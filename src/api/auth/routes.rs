/*
 * Responsibility
 * - URL structure under /api/auth
 */
use axum::{Router, routing::post};

use crate::api::auth::handlers::validate::validate;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/validate", post(validate))
}
