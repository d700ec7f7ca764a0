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
    state::AppState,
    users::{dto::UserRow, services::ModerationService},
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/ban", post(ban_user))
        .route("/users/:id/unban", post(unban_user))
}

#[instrument(skip(svc, _admin))]
pub async fn list_users(
    State(svc): State<ModerationService>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<UserRow>>> {
    Ok(Json(svc.list_users().await?))
}

#[instrument(skip(svc, admin), fields(admin_id = %admin.0))]
pub async fn ban_user(
    State(svc): State<ModerationService>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    svc.ban(id).await?;
    Ok(Json(MessageResponse::new("User banned successfully")))
}

#[instrument(skip(svc, admin), fields(admin_id = %admin.0))]
pub async fn unban_user(
    State(svc): State<ModerationService>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    svc.unban(id).await?;
    Ok(Json(MessageResponse::new("User unbanned successfully")))
}
