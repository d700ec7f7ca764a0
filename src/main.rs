use std::sync::Arc;

mod app;
mod auth;
mod categories;
mod config;
mod dashboard;
mod db;
mod dto;
mod error;
mod home;
mod jobs;
#[cfg(test)]
mod memory;
mod notifications;
mod seed;
mod state;
mod users;
mod workers;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "gigboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let state = AppState::from_pool(pool, config.clone());
    seed::seed_default_users(state.users.as_ref(), &config.seed).await?;

    let app = app::build_app(state);
    app::serve(app, &config).await
}
