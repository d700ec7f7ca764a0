use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod services;

pub fn admin_router() -> Router<AppState> {
    handlers::admin_routes()
}
