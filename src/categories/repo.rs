use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::categories::repo_types::Category;

/// Failure of a category insert or rename.
#[derive(Debug, Error)]
pub enum CategoryWriteError {
    /// Another category already holds the name.
    #[error("category name already taken")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CategoryWriteError {
    fn from_sqlx(e: sqlx::Error, what: &'static str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CategoryWriteError::Duplicate,
            _ => CategoryWriteError::Other(anyhow::Error::new(e).context(what)),
        }
    }
}

/// Name uniqueness is enforced by the store itself, so concurrent writers
/// get `Duplicate` rather than a raw constraint error.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<Category>>;
    async fn create(&self, name: &str) -> Result<Category, CategoryWriteError>;
    async fn rename(&self, id: Uuid, name: &str)
        -> Result<Option<Category>, CategoryWriteError>;
    /// Returns false when nothing was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgCategoryStore {
    db: PgPool,
}

impl PgCategoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list_all(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.db)
            .await
            .context("list categories")?;
        Ok(rows)
    }

    async fn create(&self, name: &str) -> Result<Category, CategoryWriteError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| CategoryWriteError::from_sqlx(e, "insert category"))?;
        Ok(row)
    }

    async fn rename(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Category>, CategoryWriteError> {
        let row = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| CategoryWriteError::from_sqlx(e, "rename category"))?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete category")?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn taken_name_is_reported_as_duplicate() {
        let store = AppState::fake().categories;
        let a = store.create("Plumbing").await.unwrap();
        let b = store.create("Painting").await.unwrap();

        assert!(matches!(
            store.create("Plumbing").await.unwrap_err(),
            CategoryWriteError::Duplicate
        ));
        assert!(matches!(
            store.rename(b.id, "Plumbing").await.unwrap_err(),
            CategoryWriteError::Duplicate
        ));
        // keeping its own name is not a conflict
        assert_eq!(store.rename(a.id, "Plumbing").await.unwrap(), Some(a));
    }
}
