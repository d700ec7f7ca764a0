use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::AdminUser,
    dashboard::{
        dto::{DashboardStats, FraudReport, HeatmapBucket},
        services::{self, DashboardService},
    },
    error::AppResult,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/jobs/heatmap", get(job_heatmap))
        .route("/fraud/reports", get(fraud_reports))
}

#[instrument(skip(svc, _admin))]
pub async fn dashboard(
    State(svc): State<DashboardService>,
    _admin: AdminUser,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(svc.stats().await?))
}

pub async fn job_heatmap(_admin: AdminUser) -> Json<Vec<HeatmapBucket>> {
    Json(services::heatmap())
}

pub async fn fraud_reports(_admin: AdminUser) -> Json<Vec<FraudReport>> {
    Json(services::fraud_reports(OffsetDateTime::now_utc()))
}
