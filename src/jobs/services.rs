use std::{collections::HashMap, sync::Arc};

use axum::extract::FromRef;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    jobs::{
        dto::JobSummary,
        repo::{AssignmentStore, JobStore},
        repo_types::{Job, JobStatus},
    },
    notifications::{dispatch, Notification, Notifier},
    state::AppState,
    users::repo::UserStore,
    workers::repo::WorkerStore,
};

/// Binds jobs to workers on behalf of an admin.
#[derive(Clone)]
pub struct AssignmentService {
    jobs: Arc<dyn JobStore>,
    assignments: Arc<dyn AssignmentStore>,
    workers: Arc<dyn WorkerStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl FromRef<AppState> for AssignmentService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.jobs.clone(),
            state.assignments.clone(),
            state.workers.clone(),
            state.users.clone(),
            state.notifier.clone(),
        )
    }
}

impl AssignmentService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        assignments: Arc<dyn AssignmentStore>,
        workers: Arc<dyn WorkerStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            jobs,
            assignments,
            workers,
            users,
            notifier,
        }
    }

    /// Gives `job_id` to the worker behind `worker_profile_id`, replacing any
    /// previous worker. An OPEN job becomes ASSIGNED; any other status is kept.
    /// Concurrent calls for the same job are last-write-wins.
    pub async fn reassign(&self, job_id: Uuid, worker_profile_id: Option<Uuid>) -> AppResult<Job> {
        let worker_profile_id =
            worker_profile_id.ok_or_else(|| AppError::validation("workerProfileId required"))?;

        let mut job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or(AppError::NotFound("job"))?;
        let worker = self
            .workers
            .find_by_id(worker_profile_id)
            .await?
            .ok_or(AppError::NotFound("worker profile"))?;
        let worker_user = self
            .users
            .find_by_id(worker.user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        let assignment = self
            .assignments
            .upsert_for_job(job.id, worker.id)
            .await?;

        job.worker_id = Some(worker_user.id);
        if job.status == JobStatus::Open {
            job.status = JobStatus::Assigned;
        }
        self.jobs.save(&job).await?;

        info!(
            %job_id,
            %worker_profile_id,
            assignment_id = %assignment.id,
            status = ?job.status,
            "job reassigned"
        );

        dispatch(
            self.notifier.clone(),
            Notification::JobAccepted {
                user_id: job.client_id,
                job_id: job.id,
                worker_name: worker_user.name,
            },
        );
        Ok(job)
    }

    pub async fn list_jobs(&self) -> AppResult<Vec<JobSummary>> {
        let jobs = self.jobs.list_all().await?;
        let names: HashMap<Uuid, String> = self
            .users
            .list_all()
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();
        Ok(jobs
            .into_iter()
            .map(|j| JobSummary {
                id: j.id,
                title: j.title,
                status: j.status,
                client_name: names.get(&j.client_id).cloned(),
                worker_id: j.worker_id,
                address: j.address,
                scheduled_at: j.scheduled_at,
                created_at: j.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jobs::repo_types::AssignmentStatus,
        notifications::FailingNotifier,
        users::repo_types::Role,
        workers::repo_types::{VerificationStatus, WorkerProfile},
    };
    use std::time::Duration;

    async fn worker(state: &AppState, name: &str, email: &str) -> WorkerProfile {
        let user = state.seed_user(name, email, Role::Worker).await;
        state
            .seed_worker(user.id, VerificationStatus::Verified, 4.5)
            .await
    }

    #[tokio::test]
    async fn reassign_open_job_assigns_and_notifies_client() {
        let (state, mut rx) = AppState::fake_with_notifications();
        let client = state.seed_user("C1", "c1@test.com", Role::Client).await;
        let job = state.seed_job(client.id, "Fix tap", None).await;
        let w1 = worker(&state, "Asha", "w1@test.com").await;
        let svc = AssignmentService::from_ref(&state);

        svc.reassign(job.id, Some(w1.id)).await.unwrap();

        let stored = state.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Assigned);
        assert_eq!(stored.worker_id, Some(w1.user_id));

        let assignment = state.assignments.find_by_job(job.id).await.unwrap().unwrap();
        assert_eq!(assignment.worker_profile_id, w1.id);
        assert_eq!(assignment.status, AssignmentStatus::Assigned);
        assert_eq!(state.assignments.count_by_job(job.id).await.unwrap(), 1);

        let sent = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            sent,
            Notification::JobAccepted {
                user_id: client.id,
                job_id: job.id,
                worker_name: "Asha".into()
            }
        );
    }

    #[tokio::test]
    async fn reassigning_twice_keeps_one_assignment() {
        let state = AppState::fake();
        let client = state.seed_user("C1", "c1@test.com", Role::Client).await;
        let job = state.seed_job(client.id, "Paint wall", None).await;
        let w1 = worker(&state, "Asha", "w1@test.com").await;
        let w2 = worker(&state, "Bala", "w2@test.com").await;
        let svc = AssignmentService::from_ref(&state);

        svc.reassign(job.id, Some(w1.id)).await.unwrap();
        let first = state.assignments.find_by_job(job.id).await.unwrap().unwrap();
        svc.reassign(job.id, Some(w2.id)).await.unwrap();

        assert_eq!(state.assignments.count_by_job(job.id).await.unwrap(), 1);
        let second = state.assignments.find_by_job(job.id).await.unwrap().unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.worker_profile_id, w2.id);

        let stored = state.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.worker_id, Some(w2.user_id));
        assert_eq!(stored.status, JobStatus::Assigned);
    }

    #[tokio::test]
    async fn reassign_keeps_non_open_status() {
        let state = AppState::fake();
        let client = state.seed_user("C1", "c1@test.com", Role::Client).await;
        let mut job = state.seed_job(client.id, "Wiring", None).await;
        job.status = JobStatus::InProgress;
        state.jobs.save(&job).await.unwrap();
        let w1 = worker(&state, "Asha", "w1@test.com").await;

        AssignmentService::from_ref(&state)
            .reassign(job.id, Some(w1.id))
            .await
            .unwrap();

        let stored = state.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::InProgress);
        assert_eq!(stored.worker_id, Some(w1.user_id));
    }

    #[tokio::test]
    async fn reassign_errors() {
        let state = AppState::fake();
        let client = state.seed_user("C1", "c1@test.com", Role::Client).await;
        let job = state.seed_job(client.id, "Fix tap", None).await;
        let w1 = worker(&state, "Asha", "w1@test.com").await;
        let svc = AssignmentService::from_ref(&state);

        assert!(matches!(
            svc.reassign(job.id, None).await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            svc.reassign(Uuid::new_v4(), Some(w1.id)).await.unwrap_err(),
            AppError::NotFound("job")
        ));
        assert!(matches!(
            svc.reassign(job.id, Some(Uuid::new_v4())).await.unwrap_err(),
            AppError::NotFound("worker profile")
        ));
        assert!(state.assignments.find_by_job(job.id).await.unwrap().is_none());
        let stored = state.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Open);
    }

    #[tokio::test]
    async fn notification_failure_does_not_undo_assignment() {
        let state = AppState::fake().with_notifier(Arc::new(FailingNotifier));
        let client = state.seed_user("C1", "c1@test.com", Role::Client).await;
        let job = state.seed_job(client.id, "Fix tap", None).await;
        let w1 = worker(&state, "Asha", "w1@test.com").await;

        AssignmentService::from_ref(&state)
            .reassign(job.id, Some(w1.id))
            .await
            .unwrap();
        tokio::task::yield_now().await;

        let stored = state.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Assigned);
    }

    #[tokio::test]
    async fn list_jobs_resolves_client_names() {
        let state = AppState::fake();
        let client = state.seed_user("Kiran", "k@test.com", Role::Client).await;
        state.seed_job(client.id, "Fix tap", None).await;
        let list = AssignmentService::from_ref(&state).list_jobs().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].client_name.as_deref(), Some("Kiran"));
        assert_eq!(list[0].worker_id, None);
    }
}
