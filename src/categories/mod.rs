use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn admin_router() -> Router<AppState> {
    handlers::admin_routes()
}
