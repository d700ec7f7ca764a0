//! In-memory implementation of every store, used by `AppState::fake()`.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    categories::{
        repo::{CategoryStore, CategoryWriteError},
        repo_types::Category,
    },
    jobs::{
        repo::{AssignmentStore, JobStore},
        repo_types::{AssignmentStatus, Job, JobAssignment, JobStatus, NewJob},
    },
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    workers::{
        repo::{DocumentStore, WorkerStore},
        repo_types::{Document, NewDocument, NewWorkerProfile, VerificationStatus, WorkerProfile},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    assignments: Vec<JobAssignment>,
    workers: Vec<WorkerProfile>,
    documents: Vec<Document>,
    categories: Vec<Category>,
}

#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory db poisoned")
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut t = self.lock();
        anyhow::ensure!(
            !t.users.iter().any(|u| u.email == user.email),
            "duplicate email {}",
            user.email
        );
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            banned: false,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        Ok(t.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.banned = banned;
            u.clone()
        }))
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.lock().users.len() as i64)
    }
}

#[async_trait]
impl JobStore for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Job>> {
        Ok(self.lock().jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Job>> {
        let mut jobs = self.lock().jobs.clone();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn create(&self, job: NewJob) -> anyhow::Result<Job> {
        let row = Job {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            address: job.address,
            scheduled_at: job.scheduled_at,
            status: JobStatus::Open,
            client_id: job.client_id,
            worker_id: None,
            category_id: job.category_id,
            created_at: OffsetDateTime::now_utc(),
            completed_at: None,
        };
        self.lock().jobs.push(row.clone());
        Ok(row)
    }

    async fn save(&self, job: &Job) -> anyhow::Result<()> {
        if let Some(slot) = self.lock().jobs.iter_mut().find(|j| j.id == job.id) {
            // created_at and client_id are immutable
            *slot = Job {
                created_at: slot.created_at,
                client_id: slot.client_id,
                ..job.clone()
            };
        }
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.lock().jobs.len() as i64)
    }

    async fn count_created_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<i64> {
        Ok(self
            .lock()
            .jobs
            .iter()
            .filter(|j| j.created_at >= from && j.created_at <= to)
            .count() as i64)
    }

    async fn count_completed_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<i64> {
        Ok(self
            .lock()
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Completed)
            .filter(|j| matches!(j.completed_at, Some(at) if at >= from && at <= to))
            .count() as i64)
    }

    async fn count_by_statuses(&self, statuses: &[JobStatus]) -> anyhow::Result<i64> {
        Ok(self
            .lock()
            .jobs
            .iter()
            .filter(|j| statuses.contains(&j.status))
            .count() as i64)
    }

    async fn most_popular_category(&self) -> anyhow::Result<Option<String>> {
        let t = self.lock();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for id in t.jobs.iter().filter_map(|j| j.category_id) {
            *counts.entry(id).or_default() += 1;
        }
        Ok(t.categories
            .iter()
            .filter_map(|c| counts.get(&c.id).map(|n| (*n, c)))
            .max_by(|(na, a), (nb, b)| na.cmp(nb).then_with(|| b.name.cmp(&a.name)))
            .map(|(_, c)| c.name.clone()))
    }
}

#[async_trait]
impl AssignmentStore for MemoryDb {
    async fn find_by_job(&self, job_id: Uuid) -> anyhow::Result<Option<JobAssignment>> {
        Ok(self
            .lock()
            .assignments
            .iter()
            .find(|a| a.job_id == job_id)
            .cloned())
    }

    async fn upsert_for_job(
        &self,
        job_id: Uuid,
        worker_profile_id: Uuid,
    ) -> anyhow::Result<JobAssignment> {
        let mut t = self.lock();
        let now = OffsetDateTime::now_utc();
        if let Some(a) = t.assignments.iter_mut().find(|a| a.job_id == job_id) {
            a.worker_profile_id = worker_profile_id;
            a.updated_at = now;
            return Ok(a.clone());
        }
        let row = JobAssignment {
            id: Uuid::new_v4(),
            job_id,
            worker_profile_id,
            status: AssignmentStatus::Assigned,
            created_at: now,
            updated_at: now,
        };
        t.assignments.push(row.clone());
        Ok(row)
    }

    async fn count_by_job(&self, job_id: Uuid) -> anyhow::Result<i64> {
        Ok(self
            .lock()
            .assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .count() as i64)
    }
}

#[async_trait]
impl WorkerStore for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<WorkerProfile>> {
        Ok(self.lock().workers.iter().find(|w| w.id == id).cloned())
    }

    async fn list_by_statuses(
        &self,
        statuses: &[VerificationStatus],
    ) -> anyhow::Result<Vec<WorkerProfile>> {
        Ok(self
            .lock()
            .workers
            .iter()
            .filter(|w| statuses.contains(&w.verification_status))
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> anyhow::Result<Option<WorkerProfile>> {
        let mut t = self.lock();
        Ok(t.workers.iter_mut().find(|w| w.id == id).map(|w| {
            w.verification_status = status;
            w.clone()
        }))
    }

    async fn top_by_rating(&self, limit: i64) -> anyhow::Result<Vec<WorkerProfile>> {
        let mut workers = self.lock().workers.clone();
        workers.sort_by(|a, b| {
            b.rating_avg
                .total_cmp(&a.rating_avg)
                .then_with(|| b.rating_count.cmp(&a.rating_count))
        });
        workers.truncate(limit.max(0) as usize);
        Ok(workers)
    }

    async fn create(&self, profile: NewWorkerProfile) -> anyhow::Result<WorkerProfile> {
        let row = WorkerProfile {
            id: Uuid::new_v4(),
            user_id: profile.user_id,
            verification_status: profile.verification_status,
            aadhaar_number: profile.aadhaar_number,
            pan_number: profile.pan_number,
            address: profile.address,
            rating_avg: profile.rating_avg,
            rating_count: profile.rating_count,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().workers.push(row.clone());
        Ok(row)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.lock().workers.len() as i64)
    }

    async fn count_by_statuses(&self, statuses: &[VerificationStatus]) -> anyhow::Result<i64> {
        Ok(self
            .lock()
            .workers
            .iter()
            .filter(|w| statuses.contains(&w.verification_status))
            .count() as i64)
    }
}

#[async_trait]
impl DocumentStore for MemoryDb {
    async fn list_by_worker(&self, worker_id: Uuid) -> anyhow::Result<Vec<Document>> {
        Ok(self
            .lock()
            .documents
            .iter()
            .filter(|d| d.worker_id == worker_id)
            .cloned()
            .collect())
    }

    async fn set_status_for_worker(
        &self,
        worker_id: Uuid,
        status: VerificationStatus,
    ) -> anyhow::Result<u64> {
        let mut n = 0;
        for d in self
            .lock()
            .documents
            .iter_mut()
            .filter(|d| d.worker_id == worker_id)
        {
            d.verification_status = status;
            n += 1;
        }
        Ok(n)
    }

    async fn create(&self, doc: NewDocument) -> anyhow::Result<Document> {
        let row = Document {
            id: Uuid::new_v4(),
            worker_id: doc.worker_id,
            doc_type: doc.doc_type,
            file_url: doc.file_url,
            verification_status: VerificationStatus::PendingBasic,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().documents.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl CategoryStore for MemoryDb {
    async fn list_all(&self) -> anyhow::Result<Vec<Category>> {
        let mut rows = self.lock().categories.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create(&self, name: &str) -> Result<Category, CategoryWriteError> {
        let mut t = self.lock();
        if t.categories.iter().any(|c| c.name == name) {
            return Err(CategoryWriteError::Duplicate);
        }
        let row = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        t.categories.push(row.clone());
        Ok(row)
    }

    async fn rename(
        &self,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Category>, CategoryWriteError> {
        let mut t = self.lock();
        if !t.categories.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        if t.categories.iter().any(|c| c.name == name && c.id != id) {
            return Err(CategoryWriteError::Duplicate);
        }
        Ok(t.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() != before)
    }
}
