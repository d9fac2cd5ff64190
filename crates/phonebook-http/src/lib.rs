//! # phonebook-http
//!
//! REST surface of the phonebook service, built on axum.
//!
//! ```text
//! request ─► request_log ─► origin_firewall ─► route handler ─► Directory
//!                                 │                                 │
//!                                 └─► 403 on deny      ApiError ◄───┘ (classified once)
//! ```
//!
//! Handlers hold no logic of their own: they decode the request, call
//! one [`Directory`] operation and encode the result.

pub mod handlers;
pub mod middleware;
pub mod protocol;
pub mod response;

use axum::{Router, routing::get};
use phonebook_core::{Directory, OriginFirewall};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use handlers::{
    handle_create, handle_delete, handle_get, handle_info, handle_list, handle_unknown_endpoint,
    handle_update,
};
use protocol::{ENDPOINT_INFO, ENDPOINT_PERSON, ENDPOINT_PERSONS};

/// State shared by every request
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory>,
    pub firewall: Arc<OriginFirewall>,
}

impl AppState {
    pub fn new(directory: Directory, firewall: OriginFirewall) -> Self {
        Self {
            directory: Arc::new(directory),
            firewall: Arc::new(firewall),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ENDPOINT_PERSONS, get(handle_list).post(handle_create))
        .route(
            ENDPOINT_PERSON,
            get(handle_get).put(handle_update).delete(handle_delete),
        )
        .route(ENDPOINT_INFO, get(handle_info))
        .fallback(handle_unknown_endpoint)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::origin_firewall,
        ))
        .layer(axum::middleware::from_fn(middleware::request_log))
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("HTTP server listening on {}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
