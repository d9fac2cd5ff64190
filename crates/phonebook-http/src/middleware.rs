//! Request middleware
//!
//! - [`origin_firewall`]: runs the Origin Firewall before any handler and
//!   adds the cross-origin response headers for admitted browser requests
//! - [`request_log`]: one log line per request

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use phonebook_core::Decision;
use std::time::Instant;

use crate::AppState;
use crate::response::error_response;

/// Methods advertised to preflight requests
const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

pub async fn origin_firewall(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // An unreadable Origin header is still a declared origin; it can never match
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .map(|value| value.to_str().unwrap_or_default().to_string());

    if let Decision::Deny { reason } = state.firewall.decide(origin.as_deref()) {
        tracing::warn!(
            "Origin {:?} denied for {} {}",
            origin.as_deref().unwrap_or_default(),
            request.method(),
            request.uri().path()
        );
        return error_response(StatusCode::FORBIDDEN, reason);
    }

    let Some(origin) = origin else {
        return next.run(request).await;
    };

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        if let Some(requested) = request.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        allow_origin(headers, &origin);
        return response;
    }

    let mut response = next.run(request).await;
    allow_origin(response.headers_mut(), &origin);
    response
}

fn allow_origin(headers: &mut HeaderMap, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }
}

pub async fn request_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        "{} {} {} {} ms",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
