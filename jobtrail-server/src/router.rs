//! Main [axum::Router] interface for webserver.

use crate::{
    app_state::AppState,
    routes::{applications, fallback::notfound_404, health, ping},
    setups::ServerSetup,
};
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

/// Setup main router for application.
pub fn setup_app_router<S: ServerSetup>(app_state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
        ])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
            http::header::ACCEPT,
        ])
        // allow requests from any origin
        .allow_origin(Any);

    let api_router = Router::new()
        .route(
            "/applications",
            get(applications::list::<S>)
                .post(applications::create::<S>)
                .delete(applications::delete_all::<S>),
        )
        .route(
            "/applications/companies",
            get(applications::company_counts::<S>),
        )
        .route(
            "/applications/:id",
            get(applications::get_one::<S>)
                .put(applications::update::<S>)
                .delete(applications::delete_one::<S>),
        )
        .layer(cors);

    Router::new()
        .route("/ping", get(ping::get))
        .route("/healthcheck", get(health::healthcheck::<S>))
        .nest("/api", api_router)
        .fallback(notfound_404)
        .with_state(app_state)
}
