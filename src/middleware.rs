use std::any::Any;

use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{error::AppError, logging::panic_message};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Rewrites plain-text or empty error responses (unknown routes, wrong
/// methods, static files that do not exist) into the `{"error": ...}` shape
/// used by the handlers. Browsers asking for HTML get the original response.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let wants_html = accepts_html(&req);
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    if wants_html || has_content_type(&response, &["application/json", "+json", "text/html"]) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => body_bytes_to_message(status, bytes),
        Err(_) => default_message(status),
    };
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %message, "request failed");
    }

    let mut rewritten = AppError::new(status, message).into_response();
    copy_headers(&parts.headers, &mut rewritten);
    rewritten
}

pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_to_json)
}

fn panic_to_json(panic: Box<dyn Any + Send + 'static>) -> Response {
    let client_message = if cfg!(debug_assertions) {
        format!("internal server error: {}", panic_message(&*panic))
    } else {
        "internal server error".to_string()
    };
    AppError::internal(client_message).into_response()
}

fn accepts_html(req: &Request) -> bool {
    header_contains(req.headers().get(header::ACCEPT), &["text/html"])
}

fn has_content_type(response: &Response, needles: &[&str]) -> bool {
    header_contains(response.headers().get(header::CONTENT_TYPE), needles)
}

fn header_contains(value: Option<&HeaderValue>, needles: &[&str]) -> bool {
    value
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            needles.iter().any(|needle| value.contains(needle))
        })
        .unwrap_or(false)
}

fn body_bytes_to_message(status: StatusCode, bytes: Bytes) -> String {
    let message = String::from_utf8_lossy(&bytes).trim().to_string();
    if message.is_empty() {
        return default_message(status);
    }
    message
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}
