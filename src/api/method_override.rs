//! HTTP method override for HTML forms
//!
//! Browsers only submit forms with GET or POST. A POST carrying
//! `_method=PUT|PATCH|DELETE`, either in its query string or in an urlencoded
//! body, is dispatched as that method. This must run before routing, so the
//! router is wrapped as the fallback of an outer router carrying the layer.

use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

const METHOD_FIELD: &str = "_method";

/// Largest urlencoded body inspected for an override
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Wrap `router` so that overridden methods are seen by its routing
pub fn wrap(router: Router) -> Router {
    Router::new()
        .fallback_service(router)
        .layer(middleware::from_fn(method_override))
}

pub async fn method_override(req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();

    if let Some(method) = parts.uri.query().and_then(override_from_pairs) {
        tracing::trace!("Method override {} {}", method, parts.uri.path());
        parts.method = method;
        return next.run(Request::from_parts(parts, body)).await;
    }

    if !is_urlencoded(&parts.headers) {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let bytes = match axum::body::to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    if let Some(method) = std::str::from_utf8(&bytes).ok().and_then(override_from_pairs) {
        tracing::trace!("Method override {} {}", method, parts.uri.path());
        parts.method = method;
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Find `_method` in `a=b&c=d` pairs. Only methods a form cannot send are
/// accepted.
fn override_from_pairs(pairs: &str) -> Option<Method> {
    pairs
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == METHOD_FIELD)
        .and_then(|(_, value)| match value.to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        })
}
