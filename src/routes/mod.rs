//! Route modules for Uploader Server

pub mod download;
pub mod health;
pub mod upload;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/upload",
            get(upload::upload_form)
                .post(upload::upload)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/download/*name", get(download::download))
        .nest("/health", health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
