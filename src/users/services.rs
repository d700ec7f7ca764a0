use std::sync::Arc;

use axum::extract::FromRef;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{dto::UserRow, repo::UserStore, repo_types::User},
};

/// Account listing and ban/unban.
#[derive(Clone)]
pub struct ModerationService {
    users: Arc<dyn UserStore>,
}

impl FromRef<AppState> for ModerationService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone())
    }
}

impl ModerationService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserRow>> {
        let users = self.users.list_all().await?;
        Ok(users.into_iter().map(UserRow::from).collect())
    }

    pub async fn ban(&self, user_id: Uuid) -> AppResult<User> {
        self.set_banned(user_id, true).await
    }

    pub async fn unban(&self, user_id: Uuid) -> AppResult<User> {
        self.set_banned(user_id, false).await
    }

    // Active jobs and sessions of a banned user are left alone.
    async fn set_banned(&self, user_id: Uuid, banned: bool) -> AppResult<User> {
        let user = self
            .users
            .set_banned(user_id, banned)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        info!(%user_id, banned, "user ban flag updated");
        Ok(user)
    }
}
