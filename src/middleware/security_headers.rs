//! Security-related response headers.
//!
//! Responses of this service carry decoded token claims, so besides the usual
//! browser hardening headers every response is marked `no-store`.
//! Headers already set by a handler are left untouched.

use axum::Router;
use axum::http::header::{self, HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

const HEADERS: [(HeaderName, &str); 6] = [
    // Claims must not end up in shared or browser caches
    (header::CACHE_CONTROL, "no-store"),
    // Clickjacking protection (legacy + modern)
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::CONTENT_SECURITY_POLICY, "frame-ancestors 'none'"),
    // Prevent MIME sniffing
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    // Limit referrer leakage
    (header::REFERRER_POLICY, "no-referrer"),
    (
        HeaderName::from_static("permissions-policy"),
        "camera=(), microphone=(), geolocation=()",
    ),
];

/// Apply the security headers to all responses of `router`.
pub fn apply(router: Router) -> Router {
    HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                name,
                HeaderValue::from_static(value),
            ))
        })
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_headers_are_added() {
        let router = apply(Router::new().route("/", get(|| async { "ok" })));

        let res = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = res.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
        assert!(headers.contains_key("permissions-policy"));
    }

    #[tokio::test]
    async fn test_handler_headers_win() {
        let router = apply(Router::new().route(
            "/",
            get(|| async { ([(header::CACHE_CONTROL, "max-age=60")], "ok") }),
        ));

        let res = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.headers()[header::CACHE_CONTROL], "max-age=60");
    }
}
