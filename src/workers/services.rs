use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    notifications::{dispatch, Notification, Notifier, VerificationDecision},
    state::AppState,
    users::{repo::UserStore, repo_types::User},
    workers::{
        dto::{DocumentView, LeaderboardEntry, PendingWorker, VerifiedWorker},
        repo::{DocumentStore, WorkerStore},
        repo_types::{VerificationStatus, WorkerProfile},
    },
};

const LEADERBOARD_SIZE: i64 = 10;

/// Admin review of worker identity verification.
///
/// Approval cascades `VERIFIED` to every document of the worker; rejection
/// only touches the profile, so documents keep their own review state. Both
/// decisions notify the worker.
#[derive(Clone)]
pub struct VerificationService {
    workers: Arc<dyn WorkerStore>,
    documents: Arc<dyn DocumentStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl FromRef<AppState> for VerificationService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.workers.clone(),
            state.documents.clone(),
            state.users.clone(),
            state.notifier.clone(),
        )
    }
}

impl VerificationService {
    pub fn new(
        workers: Arc<dyn WorkerStore>,
        documents: Arc<dyn DocumentStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            workers,
            documents,
            users,
            notifier,
        }
    }

    pub async fn approve(&self, worker_id: Uuid) -> AppResult<WorkerProfile> {
        let worker = self
            .workers
            .set_status(worker_id, VerificationStatus::Verified)
            .await?
            .ok_or(AppError::NotFound("worker profile"))?;
        let documents = self
            .documents
            .set_status_for_worker(worker_id, VerificationStatus::Verified)
            .await?;
        info!(%worker_id, documents, "worker approved");

        dispatch(
            self.notifier.clone(),
            Notification::VerificationDecision {
                user_id: worker.user_id,
                decision: VerificationDecision::Approved,
            },
        );
        Ok(worker)
    }

    pub async fn reject(&self, worker_id: Uuid, reason: Option<String>) -> AppResult<WorkerProfile> {
        let worker = self
            .workers
            .set_status(worker_id, VerificationStatus::Rejected)
            .await?
            .ok_or(AppError::NotFound("worker profile"))?;
        info!(%worker_id, reason = ?reason, "worker rejected");

        dispatch(
            self.notifier.clone(),
            Notification::VerificationDecision {
                user_id: worker.user_id,
                decision: VerificationDecision::Rejected { reason },
            },
        );
        Ok(worker)
    }

    pub async fn list_pending(&self) -> AppResult<Vec<PendingWorker>> {
        let workers = self
            .workers
            .list_by_statuses(&VerificationStatus::PENDING)
            .await?;
        let mut out = Vec::with_capacity(workers.len());
        for w in workers {
            let Some(user) = self.owner(&w).await? else {
                continue;
            };
            let documents = self
                .documents
                .list_by_worker(w.id)
                .await?
                .into_iter()
                .map(DocumentView::from)
                .collect();
            out.push(PendingWorker {
                id: w.id,
                user_id: user.id,
                name: user.name,
                email: user.email,
                phone: user.phone,
                verification_status: w.verification_status,
                aadhaar_number: w.aadhaar_number,
                pan_number: w.pan_number,
                address: w.address,
                documents,
            });
        }
        Ok(out)
    }

    pub async fn list_verified(&self) -> AppResult<Vec<VerifiedWorker>> {
        let workers = self
            .workers
            .list_by_statuses(&[VerificationStatus::Verified])
            .await?;
        let mut out = Vec::with_capacity(workers.len());
        for w in workers {
            if let Some(user) = self.owner(&w).await? {
                out.push(VerifiedWorker {
                    id: w.id,
                    user_id: user.id,
                    name: user.name,
                    phone: user.phone,
                });
            }
        }
        Ok(out)
    }

    pub async fn leaderboard(&self) -> AppResult<Vec<LeaderboardEntry>> {
        let workers = self.workers.top_by_rating(LEADERBOARD_SIZE).await?;
        let mut out = Vec::with_capacity(workers.len());
        for w in workers {
            if let Some(user) = self.owner(&w).await? {
                out.push(LeaderboardEntry {
                    id: w.id,
                    user_id: user.id,
                    name: user.name,
                    rating_avg: w.rating_avg,
                    rating_count: w.rating_count,
                    verification_status: w.verification_status,
                });
            }
        }
        Ok(out)
    }

    async fn owner(&self, worker: &WorkerProfile) -> anyhow::Result<Option<User>> {
        let user = self.users.find_by_id(worker.user_id).await?;
        if user.is_none() {
            warn!(worker_id = %worker.id, user_id = %worker.user_id, "worker profile without user");
        }
        Ok(user)
    }
}
