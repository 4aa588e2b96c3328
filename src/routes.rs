use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::handlers;
use crate::rate_limit::limit_by_address;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let body_limit = state.config.system_config.body_limit_mb * 1024 * 1024;

    let translate = Router::new()
        .route("/api/translate", post(handlers::translate))
        .route_layer(middleware::from_fn_with_state(
            state.translate_limiter.clone(),
            limit_by_address,
        ));

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        .merge(translate)
        .route("/api/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(body_limit))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is running"
    }))
}
