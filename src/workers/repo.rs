use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::workers::repo_types::{
    Document, NewDocument, NewWorkerProfile, VerificationStatus, WorkerProfile,
};

#[async_trait]
pub trait WorkerStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<WorkerProfile>>;
    async fn list_by_statuses(
        &self,
        statuses: &[VerificationStatus],
    ) -> anyhow::Result<Vec<WorkerProfile>>;
    /// Returns the updated profile, or `None` when the id is unknown.
    async fn set_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> anyhow::Result<Option<WorkerProfile>>;
    async fn top_by_rating(&self, limit: i64) -> anyhow::Result<Vec<WorkerProfile>>;
    async fn create(&self, profile: NewWorkerProfile) -> anyhow::Result<WorkerProfile>;
    async fn count(&self) -> anyhow::Result<i64>;
    async fn count_by_statuses(&self, statuses: &[VerificationStatus]) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_by_worker(&self, worker_id: Uuid) -> anyhow::Result<Vec<Document>>;
    /// Sets every document of the worker to `status`; returns how many changed.
    async fn set_status_for_worker(
        &self,
        worker_id: Uuid,
        status: VerificationStatus,
    ) -> anyhow::Result<u64>;
    async fn create(&self, doc: NewDocument) -> anyhow::Result<Document>;
}

fn status_names(statuses: &[VerificationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[derive(Clone)]
pub struct PgWorkerStore {
    db: PgPool,
}

impl PgWorkerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkerStore for PgWorkerStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<WorkerProfile>> {
        let row = sqlx::query_as::<_, WorkerProfile>(
            r#"
            SELECT id, user_id, verification_status, aadhaar_number, pan_number, address,
                   rating_avg, rating_count, created_at
            FROM worker_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find worker profile")?;
        Ok(row)
    }

    async fn list_by_statuses(
        &self,
        statuses: &[VerificationStatus],
    ) -> anyhow::Result<Vec<WorkerProfile>> {
        let rows = sqlx::query_as::<_, WorkerProfile>(
            r#"
            SELECT id, user_id, verification_status, aadhaar_number, pan_number, address,
                   rating_avg, rating_count, created_at
            FROM worker_profiles
            WHERE verification_status::text = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(status_names(statuses))
        .fetch_all(&self.db)
        .await
        .context("list worker profiles by status")?;
        Ok(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> anyhow::Result<Option<WorkerProfile>> {
        let row = sqlx::query_as::<_, WorkerProfile>(
            r#"
            UPDATE worker_profiles
               SET verification_status = $2
             WHERE id = $1
            RETURNING id, user_id, verification_status, aadhaar_number, pan_number, address,
                      rating_avg, rating_count, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.db)
        .await
        .context("update worker verification status")?;
        Ok(row)
    }

    async fn top_by_rating(&self, limit: i64) -> anyhow::Result<Vec<WorkerProfile>> {
        let rows = sqlx::query_as::<_, WorkerProfile>(
            r#"
            SELECT id, user_id, verification_status, aadhaar_number, pan_number, address,
                   rating_avg, rating_count, created_at
            FROM worker_profiles
            ORDER BY rating_avg DESC, rating_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("top workers by rating")?;
        Ok(rows)
    }

    async fn create(&self, profile: NewWorkerProfile) -> anyhow::Result<WorkerProfile> {
        let row = sqlx::query_as::<_, WorkerProfile>(
            r#"
            INSERT INTO worker_profiles
                (id, user_id, verification_status, aadhaar_number, pan_number, address,
                 rating_avg, rating_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, verification_status, aadhaar_number, pan_number, address,
                      rating_avg, rating_count, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile.user_id)
        .bind(profile.verification_status)
        .bind(&profile.aadhaar_number)
        .bind(&profile.pan_number)
        .bind(&profile.address)
        .bind(profile.rating_avg)
        .bind(profile.rating_count)
        .fetch_one(&self.db)
        .await
        .context("insert worker profile")?;
        Ok(row)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM worker_profiles")
            .fetch_one(&self.db)
            .await
            .context("count worker profiles")?;
        Ok(n)
    }

    async fn count_by_statuses(&self, statuses: &[VerificationStatus]) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM worker_profiles WHERE verification_status::text = ANY($1)",
        )
        .bind(status_names(statuses))
        .fetch_one(&self.db)
        .await
        .context("count worker profiles by status")?;
        Ok(n)
    }
}

#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_by_worker(&self, worker_id: Uuid) -> anyhow::Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, worker_id, doc_type, file_url, verification_status, created_at
            FROM documents
            WHERE worker_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.db)
        .await
        .context("list documents by worker")?;
        Ok(rows)
    }

    async fn set_status_for_worker(
        &self,
        worker_id: Uuid,
        status: VerificationStatus,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE documents
               SET verification_status = $2
             WHERE worker_id = $1
            "#,
        )
        .bind(worker_id)
        .bind(status)
        .execute(&self.db)
        .await
        .context("update document statuses")?;
        Ok(res.rows_affected())
    }

    async fn create(&self, doc: NewDocument) -> anyhow::Result<Document> {
        let row = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, worker_id, doc_type, file_url, verification_status)
            VALUES ($1, $2, $3, $4, 'PENDING_BASIC')
            RETURNING id, worker_id, doc_type, file_url, verification_status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(doc.worker_id)
        .bind(doc.doc_type)
        .bind(&doc.file_url)
        .fetch_one(&self.db)
        .await
        .context("insert document")?;
        Ok(row)
    }
}
