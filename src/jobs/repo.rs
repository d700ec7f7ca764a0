use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::jobs::repo_types::{Job, JobAssignment, JobStatus, NewJob};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Job>>;
    async fn list_all(&self) -> anyhow::Result<Vec<Job>>;
    async fn create(&self, job: NewJob) -> anyhow::Result<Job>;
    /// Writes the mutable fields of an existing job.
    async fn save(&self, job: &Job) -> anyhow::Result<()>;
    async fn count(&self) -> anyhow::Result<i64>;
    async fn count_created_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<i64>;
    async fn count_completed_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<i64>;
    async fn count_by_statuses(&self, statuses: &[JobStatus]) -> anyhow::Result<i64>;
    /// Name of the category with the most jobs.
    async fn most_popular_category(&self) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn find_by_job(&self, job_id: Uuid) -> anyhow::Result<Option<JobAssignment>>;
    /// Points the job's assignment at `worker_profile_id`, creating it with
    /// status `ASSIGNED` when the job has none. An existing assignment keeps
    /// its status.
    async fn upsert_for_job(
        &self,
        job_id: Uuid,
        worker_profile_id: Uuid,
    ) -> anyhow::Result<JobAssignment>;
    async fn count_by_job(&self, job_id: Uuid) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgJobStore {
    db: PgPool,
}

impl PgJobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, address, scheduled_at, status, client_id,
                   worker_id, category_id, created_at, completed_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find job")?;
        Ok(row)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, address, scheduled_at, status, client_id,
                   worker_id, category_id, created_at, completed_at
            FROM jobs
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list jobs")?;
        Ok(rows)
    }

    async fn create(&self, job: NewJob) -> anyhow::Result<Job> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, title, description, address, scheduled_at, client_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, address, scheduled_at, status, client_id,
                      worker_id, category_id, created_at, completed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.address)
        .bind(job.scheduled_at)
        .bind(job.client_id)
        .bind(job.category_id)
        .fetch_one(&self.db)
        .await
        .context("insert job")?;
        Ok(row)
    }

    async fn save(&self, job: &Job) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE jobs
               SET title = $2,
                   description = $3,
                   address = $4,
                   scheduled_at = $5,
                   status = $6,
                   worker_id = $7,
                   category_id = $8,
                   completed_at = $9
             WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.address)
        .bind(job.scheduled_at)
        .bind(job.status)
        .bind(job.worker_id)
        .bind(job.category_id)
        .bind(job.completed_at)
        .execute(&self.db)
        .await
        .context("update job")?;
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.db)
            .await
            .context("count jobs")?;
        Ok(n)
    }

    async fn count_created_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<i64> {
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE created_at >= $1 AND created_at <= $2")
                .bind(from)
                .bind(to)
                .fetch_one(&self.db)
                .await
                .context("count jobs created in range")?;
        Ok(n)
    }

    async fn count_completed_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM jobs
             WHERE status = 'COMPLETED'
               AND completed_at >= $1 AND completed_at <= $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await
        .context("count jobs completed in range")?;
        Ok(n)
    }

    async fn count_by_statuses(&self, statuses: &[JobStatus]) -> anyhow::Result<i64> {
        let names: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        let (n,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE status::text = ANY($1)")
                .bind(names)
                .fetch_one(&self.db)
                .await
                .context("count jobs by status")?;
        Ok(n)
    }

    async fn most_popular_category(&self) -> anyhow::Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT c.name
              FROM jobs j
              JOIN categories c ON c.id = j.category_id
             GROUP BY c.id, c.name
             ORDER BY COUNT(*) DESC, c.name ASC
             LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await
        .context("most popular category")?;
        Ok(row.map(|(name,)| name))
    }
}

#[derive(Clone)]
pub struct PgAssignmentStore {
    db: PgPool,
}

impl PgAssignmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn find_by_job(&self, job_id: Uuid) -> anyhow::Result<Option<JobAssignment>> {
        let row = sqlx::query_as::<_, JobAssignment>(
            r#"
            SELECT id, job_id, worker_profile_id, status, created_at, updated_at
            FROM job_assignments
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.db)
        .await
        .context("find assignment by job")?;
        Ok(row)
    }

    // Relies on UNIQUE (job_id): a racing insert for the same job becomes an update.
    async fn upsert_for_job(
        &self,
        job_id: Uuid,
        worker_profile_id: Uuid,
    ) -> anyhow::Result<JobAssignment> {
        let row = sqlx::query_as::<_, JobAssignment>(
            r#"
            INSERT INTO job_assignments (id, job_id, worker_profile_id, status)
            VALUES ($1, $2, $3, 'ASSIGNED')
            ON CONFLICT (job_id) DO UPDATE
               SET worker_profile_id = EXCLUDED.worker_profile_id,
                   updated_at = now()
            RETURNING id, job_id, worker_profile_id, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(worker_profile_id)
        .fetch_one(&self.db)
        .await
        .context("upsert job assignment")?;
        Ok(row)
    }

    async fn count_by_job(&self, job_id: Uuid) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_assignments WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.db)
            .await
            .context("count assignments by job")?;
        Ok(n)
    }
}
