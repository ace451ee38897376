use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::track_requests;
use crate::state::AppState;

/// Create the main application router with all routes and middleware
#[tracing::instrument(skip(state))]
pub fn create_router(state: AppState) -> Router {
    with_middleware(api_routes(), state)
}

/// Every endpoint, without layers
pub fn api_routes() -> Router<AppState> {
    let resource_routes = Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route(
            "/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route(
            "/posts/:id",
            get(handlers::posts::get_post)
                .put(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        );

    // Bulk import/delete against the placeholder source
    let bulk_routes = Router::new()
        .route("/import-users", post(handlers::bulk::import_users))
        .route("/import-posts", post(handlers::bulk::import_posts))
        .route(
            "/delete-all-records",
            delete(handlers::bulk::delete_all_records),
        );

    let public_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler));

    Router::new()
        .merge(resource_routes)
        .merge(bulk_routes)
        .merge(public_routes)
        .fallback(handlers::fallback::route_not_found)
}

/// Attach tracing, CORS, request metrics and the panic catcher
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let on_panic = handlers::fallback::panic_handler(state.config.environment);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::middleware::from_fn(track_requests))
                .layer(CatchPanicLayer::custom(on_panic)),
        )
        .with_state(state)
}
