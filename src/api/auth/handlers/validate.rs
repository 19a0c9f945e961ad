/*
 * Responsibility
 * - POST /api/auth/validate
 * - session (injected by extractor) → access token → TokenValidator → response
 * - No state of its own: the same session and validator answer give the same response
 */
use axum::{Json, extract::State};

use crate::{
    api::auth::{
        dto::validate::TokenValidResponse, error::ValidateError, extractors::CurrentSession,
    },
    services::{auth::TokenValidator, session::Session},
    state::AppState,
};

pub async fn validate(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<TokenValidResponse>, ValidateError> {
    let res = validate_session(session.as_ref(), state.validator.as_ref()).await?;
    Ok(Json(res))
}

/// Validate the access token held by `session`.
///
/// Errors:
/// - `MissingToken`: no session, or no (non-empty) access token in it
/// - `Validation`: the validator rejected the token or could not reach the provider
pub async fn validate_session(
    session: Option<&Session>,
    validator: &dyn TokenValidator,
) -> Result<TokenValidResponse, ValidateError> {
    let token = session
        .and_then(Session::access_token)
        .ok_or(ValidateError::MissingToken)?;

    let claims = validator.validate_token(token).await?;
    tracing::debug!(sub = ?claims.sub(), "access token is valid");

    Ok(TokenValidResponse::from(claims))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::auth::error::{NO_ACCESS_TOKEN, VALIDATION_FAILED};
    use crate::services::{
        auth::{Claims, ValidationError},
        session::{CookieSessionStore, SessionTokens},
    };

    const COOKIE: &str = "app_session";

    /// Validator double: answers every call with the configured outcome.
    struct FakeValidator {
        outcome: Result<Claims, Option<String>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl FakeValidator {
        fn accepting(claims: Value) -> Arc<Self> {
            Self::with(Ok(serde_json::from_value(claims).unwrap()))
        }

        fn rejecting(message: Option<&str>) -> Arc<Self> {
            Self::with(Err(message.map(str::to_string)))
        }

        fn with(outcome: Result<Claims, Option<String>>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TokenValidator for FakeValidator {
        async fn validate_token(&self, token: &str) -> Result<Claims, ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(token.to_string());
            self.outcome
                .clone()
                .map_err(|message| ValidationError::Rejected { message })
        }
    }

    fn app(validator: Arc<FakeValidator>) -> Router {
        let state = AppState::new(validator, Arc::new(CookieSessionStore::new(COOKIE)));
        Router::new()
            .nest("/api/auth", crate::api::auth::routes())
            .with_state(state)
    }

    fn session_with(access_token: Option<&str>) -> Session {
        Session {
            tokens: SessionTokens {
                access_token: access_token.map(str::to_string),
                refresh_token: Some("refresh".into()),
                ..Default::default()
            },
        }
    }

    fn session_cookie(session: &Session) -> String {
        let json = serde_json::to_vec(session).unwrap();
        format!("{COOKIE}={}", URL_SAFE_NO_PAD.encode(json))
    }

    async fn post_validate(app: Router, cookie: Option<String>) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/validate");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let res = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn user_claims() -> Value {
        json!({"sub": "u1", "email": "a@b.com", "name": "A"})
    }

    #[tokio::test]
    async fn test_no_session_is_bad_request() {
        let validator = FakeValidator::accepting(user_claims());

        let (status, body) = post_validate(app(validator.clone()), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"valid": false, "error": NO_ACCESS_TOKEN}));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_session_without_access_token_is_bad_request() {
        let validator = FakeValidator::accepting(user_claims());
        let cookie = session_cookie(&session_with(None));

        let (status, body) = post_validate(app(validator.clone()), Some(cookie)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["valid"], false);
        assert_eq!(body["error"], "No access token found");
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_access_token_is_bad_request() {
        let validator = FakeValidator::accepting(user_claims());
        let cookie = session_cookie(&session_with(Some("")));

        let (status, body) = post_validate(app(validator), Some(cookie)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["valid"], false);
    }

    #[tokio::test]
    async fn test_valid_token_echoes_claims() {
        let validator = FakeValidator::accepting(user_claims());
        let cookie = session_cookie(&session_with(Some("tok-1")));

        let (status, body) = post_validate(app(validator.clone()), Some(cookie)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "valid": true,
                "claims": {"sub": "u1", "email": "a@b.com", "name": "A"},
                "message": "Token is valid",
                "userId": "u1",
                "email": "a@b.com",
                "name": "A",
            })
        );
        assert_eq!(*validator.seen.lock().unwrap(), vec!["tok-1".to_string()]);
    }

    #[tokio::test]
    async fn test_rejection_message_is_returned() {
        let validator = FakeValidator::rejecting(Some("expired"));
        let cookie = session_cookie(&session_with(Some("tok-1")));

        let (status, body) = post_validate(app(validator), Some(cookie)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"valid": false, "error": "expired"}));
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let validator = FakeValidator::rejecting(None);
        let cookie = session_cookie(&session_with(Some("tok-1")));

        let (status, body) = post_validate(app(validator), Some(cookie)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"valid": false, "error": VALIDATION_FAILED}));
    }

    #[tokio::test]
    async fn test_corrupt_session_is_server_error() {
        let validator = FakeValidator::accepting(user_claims());
        let cookie = format!("{COOKIE}=not*base64");

        let (status, body) = post_validate(app(validator.clone()), Some(cookie)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["valid"], false);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("malformed session cookie")
        );
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_calls_give_identical_responses() {
        let validator = FakeValidator::accepting(user_claims());
        let app = app(validator.clone());
        let cookie = session_cookie(&session_with(Some("tok-1")));

        let first = post_validate(app.clone(), Some(cookie.clone())).await;
        let second = post_validate(app, Some(cookie)).await;

        assert_eq!(first.0, StatusCode::OK);
        assert_eq!(first, second);
        assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let validator = FakeValidator::accepting(user_claims());
        let res = app(validator)
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/auth/validate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_validate_session_without_router() {
        let validator = FakeValidator::accepting(json!({"sub": "u2"}));

        let err = validate_session(None, validator.as_ref()).await.unwrap_err();
        assert!(matches!(err, ValidateError::MissingToken));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let session = session_with(Some("tok-2"));
        let res = validate_session(Some(&session), validator.as_ref())
            .await
            .unwrap();
        assert!(res.valid);
        assert_eq!(res.user_id.as_deref(), Some("u2"));
        assert_eq!(res.email, None);
        assert_eq!(res.name, None);
    }
}
