use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    dto::MessageResponse,
    error::AppResult,
    jobs::{
        dto::{JobSummary, ReassignRequest},
        services::AssignmentService,
    },
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:job_id/reassign", post(reassign_job))
}

#[instrument(skip(svc, _admin))]
pub async fn list_jobs(
    State(svc): State<AssignmentService>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<JobSummary>>> {
    Ok(Json(svc.list_jobs().await?))
}

#[instrument(skip(svc, admin, payload), fields(admin_id = %admin.0))]
pub async fn reassign_job(
    State(svc): State<AssignmentService>,
    admin: AdminUser,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<ReassignRequest>,
) -> AppResult<Json<MessageResponse>> {
    svc.reassign(job_id, payload.worker_profile_id).await?;
    Ok(Json(MessageResponse::new("Job reassigned")))
}
