//! JSON API over the party registry.

pub mod routes;

use axum::http::{self, header};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/parties", post(routes::create_party))
        .route("/parties/:id", get(routes::view_party).delete(routes::close_party))
        .route("/parties/:id/participants/:name", axum::routing::put(routes::register))
        .route("/parties/:id/photos/:file", get(routes::photo).delete(routes::delete_photo))
        .route("/parties/:id/incoming", get(routes::list_incoming))
        .route("/parties/:id/completed", get(routes::list_completed))
        .route("/parties/:id/completed/:file/restore", post(routes::restore))
        .route("/parties/:id/queue/:position/seat", post(routes::seat))
        .route("/parties/:id/seats/:index/vacate", post(routes::vacate))
        .route("/parties/:id/spin", post(routes::spin))
        .route("/parties/:id/abort", post(routes::abort))
        .route("/parties/:id/acknowledge", post(routes::acknowledge))
        .layer(
            CorsLayer::new()
                .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT, http::Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
