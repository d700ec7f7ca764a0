use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    categories::{dto::CategoryRequest, repo_types::Category, services::CategoryService},
    dto::MessageResponse,
    error::AppResult,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
}

#[instrument(skip(svc, _admin))]
pub async fn list_categories(
    State(svc): State<CategoryService>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(svc.list().await?))
}

#[instrument(skip(svc, admin), fields(admin_id = %admin.0))]
pub async fn create_category(
    State(svc): State<CategoryService>,
    admin: AdminUser,
    Json(body): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    Ok(Json(svc.create(body.name).await?))
}

#[instrument(skip(svc, admin), fields(admin_id = %admin.0))]
pub async fn update_category(
    State(svc): State<CategoryService>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    Ok(Json(svc.update(id, body.name).await?))
}

#[instrument(skip(svc, admin), fields(admin_id = %admin.0))]
pub async fn delete_category(
    State(svc): State<CategoryService>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    svc.delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
