use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d410_superstore::{
    ChartData, DashboardResponse, FilterOptions, FilterRequest,
};
use std::sync::Arc;

use crate::dashboards::d410_superstore::{ChartKind, DashboardContext};

/// GET /api/d410/options
pub async fn get_options(State(ctx): State<Arc<DashboardContext>>) -> Json<FilterOptions> {
    Json(ctx.options())
}

/// POST /api/d410/charts/:kind
pub async fn get_chart(
    State(ctx): State<Arc<DashboardContext>>,
    Path(kind): Path<String>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<ChartData>, StatusCode> {
    let Some(chart_kind) = ChartKind::from_slug(&kind) else {
        tracing::warn!("Unknown chart kind requested: {}", kind);
        return Err(StatusCode::NOT_FOUND);
    };
    Ok(Json(ctx.chart(chart_kind, &request)))
}

/// POST /api/d410/dashboard
pub async fn get_dashboard(
    State(ctx): State<Arc<DashboardContext>>,
    Json(request): Json<FilterRequest>,
) -> Json<DashboardResponse> {
    Json(ctx.dashboard(&request))
}
