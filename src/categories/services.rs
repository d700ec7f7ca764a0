use std::sync::Arc;

use axum::extract::FromRef;
use tracing::info;
use uuid::Uuid;

use crate::{
    categories::{
        repo::{CategoryStore, CategoryWriteError},
        repo_types::Category,
    },
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
}

impl FromRef<AppState> for CategoryService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.categories.clone())
    }
}

impl From<CategoryWriteError> for AppError {
    fn from(e: CategoryWriteError) -> Self {
        match e {
            CategoryWriteError::Duplicate => AppError::validation("category already exists"),
            CategoryWriteError::Other(e) => AppError::Internal(e),
        }
    }
}

fn clean_name(name: Option<String>) -> AppResult<String> {
    let name = name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::validation("name required"));
    }
    Ok(name)
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn create(&self, name: Option<String>) -> AppResult<Category> {
        let name = clean_name(name)?;
        let category = self.categories.create(&name).await?;
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, name: Option<String>) -> AppResult<Category> {
        let name = clean_name(name)?;
        self.categories
            .rename(id, &name)
            .await?
            .ok_or(AppError::NotFound("category"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.categories.delete(id).await? {
            return Err(AppError::NotFound("category"));
        }
        info!(category_id = %id, "category deleted");
        Ok(())
    }
}
