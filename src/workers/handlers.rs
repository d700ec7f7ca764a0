use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    dto::MessageResponse,
    error::{AppError, AppResult},
    state::AppState,
    workers::{
        dto::{LeaderboardEntry, PendingWorker, RejectWorkerRequest, RejectWorkerResponse, VerifiedWorker},
        services::VerificationService,
    },
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/workers/pending", get(list_pending))
        .route("/workers/verified", get(list_verified))
        .route("/workers/leaderboard", get(leaderboard))
        .route("/workers/:id/approve", post(approve_worker))
        .route("/workers/:id/reject", post(reject_worker))
}

#[instrument(skip(svc, _admin))]
pub async fn list_pending(
    State(svc): State<VerificationService>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<PendingWorker>>> {
    Ok(Json(svc.list_pending().await?))
}

#[instrument(skip(svc, _admin))]
pub async fn list_verified(
    State(svc): State<VerificationService>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<VerifiedWorker>>> {
    Ok(Json(svc.list_verified().await?))
}

#[instrument(skip(svc, _admin))]
pub async fn leaderboard(
    State(svc): State<VerificationService>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(svc.leaderboard().await?))
}

#[instrument(skip(svc, admin), fields(admin_id = %admin.0))]
pub async fn approve_worker(
    State(svc): State<VerificationService>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    svc.approve(id).await?;
    Ok(Json(MessageResponse::new("Worker approved successfully")))
}

// An empty body means no reason; anything else must be valid JSON.
fn parse_reject_body(body: &[u8]) -> AppResult<RejectWorkerRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RejectWorkerRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("invalid request body: {}", e)))
}

/// Body is optional; `{}` or no body at all rejects without a reason.
#[instrument(skip(svc, admin, body), fields(admin_id = %admin.0))]
pub async fn reject_worker(
    State(svc): State<VerificationService>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> AppResult<Json<RejectWorkerResponse>> {
    let reason = parse_reject_body(&body)?.reason;
    svc.reject(id, reason.clone()).await?;
    Ok(Json(RejectWorkerResponse {
        message: "Worker rejected successfully".into(),
        reason,
    }))
}
