//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// The number of bytes of a request or response body that is logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body that is accepted, the same as axum's default body limit.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
///
/// Bodies are passed on byte for byte; the decoded text is only used for the
/// log. Request bodies larger than [REQUEST_BODY_LIMIT] are rejected with
/// `413 Payload Too Large`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(
                "could not read request body for {} {}: {error}",
                parts.method,
                parts.uri
            );
            return Error::RequestBodyTooLarge {
                limit: REQUEST_BODY_LIMIT,
            }
            .into_response();
        }
    };
    log_request(&parts, &body_text(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn body_text(body_bytes: &Bytes) -> String {
    String::from_utf8_lossy(body_bytes).into_owned()
}

/// The longest prefix of `text` that is at most [LOG_BODY_LENGTH_LIMIT] bytes
/// and does not split a character.
fn truncate(text: &str) -> &str {
    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return text;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {} {}\nbody: {body:?}", parts.method, parts.uri);
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Json, Router, body::Bytes, middleware, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, ErrorKind, build_router, category::Category, endpoints,
        test_utils::assert_error_kind,
    };

    use super::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware, truncate};

    /// The full app behind the logging middleware, as the server binary runs it.
    fn get_logged_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");
        let app = build_router(state).layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate("Mælk"), "Mælk");
    }

    #[test]
    fn truncation_does_not_split_characters() {
        // 'æ' is two bytes, so the limit falls in the middle of a character.
        let text = format!("{}æøå", "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));

        let truncated = truncate(&text);

        assert_eq!(truncated.len(), LOG_BODY_LENGTH_LIMIT - 1);
        assert!(text.starts_with(truncated));
    }

    #[tokio::test]
    async fn middleware_passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = json!({ "navn": "Rugbrød".repeat(20) });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), body);
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_rejected_not_rewritten() {
        let server = get_logged_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .bytes(Bytes::from_static(b"{\"navn\":\"Ost\xFF\"}"))
            .content_type("application/json")
            .await;

        assert_error_kind(&response, ErrorKind::ValidationError);
        let categories = server
            .get(endpoints::CATEGORIES)
            .await
            .json::<Vec<Category>>();
        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn valid_body_reaches_handler_through_middleware() {
        let server = get_logged_test_server();

        let response = server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "navn": "Ægg og Mælk" }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        assert_eq!(response.json::<Category>().name.as_ref(), "Ægg og Mælk");
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let server = get_logged_test_server();
        let body = format!("{{\"navn\":\"{}\"}}", "a".repeat(REQUEST_BODY_LIMIT));

        let response = server
            .post(endpoints::CATEGORIES)
            .text(body)
            .content_type("application/json")
            .await;

        assert_error_kind(&response, ErrorKind::PayloadTooLarge);
        assert!(
            server
                .get(endpoints::CATEGORIES)
                .await
                .json::<Vec<Category>>()
                .is_empty()
        );
    }
}
