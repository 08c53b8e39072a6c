use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::dashboards::d410_superstore::DashboardContext;
use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes(ctx: Arc<DashboardContext>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D410 SUPERSTORE DASHBOARD
        // ========================================
        .route(
            "/api/d410/options",
            get(handlers::d410_superstore::get_options),
        )
        .route(
            "/api/d410/charts/:kind",
            post(handlers::d410_superstore::get_chart),
        )
        .route(
            "/api/d410/dashboard",
            post(handlers::d410_superstore::get_dashboard),
        )
        .with_state(ctx)
}
