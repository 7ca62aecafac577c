//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::metrics::{metrics_handler, register_metrics};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/whoami", get(handlers::whoami))
        // Unauthenticated for load balancers and health checks
        .route("/health", get(handlers::health_check));

    let file_routes = Router::new()
        .route("/files", get(handlers::list_files))
        .route(
            "/files/{filename}",
            put(handlers::put_file)
                .get(handlers::get_file)
                .delete(handlers::delete_file),
        )
        .layer(DefaultBodyLimit::max(state.upload_limit()));

    let mut router = Router::new().merge(account_routes).merge(file_routes);

    // SECURITY: restrict /metrics to scraper addresses at the network level.
    if state.config.server.metrics_enabled {
        register_metrics();
        router = router.route("/metrics", get(metrics_handler));
    }

    // Order of execution: TraceLayer -> Auth -> Handler
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
