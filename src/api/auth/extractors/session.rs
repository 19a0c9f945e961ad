use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::auth::error::ValidateError;
use crate::services::session::Session;
use crate::state::AppState;

/// The caller's session, looked up through the configured `SessionStore`.
///
/// `None` when the request carries no session. A store failure rejects the
/// request with a 500 in the validation error shape.
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ValidateError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.sessions.load(&parts.headers).await?;
        Ok(CurrentSession(session))
    }
}
