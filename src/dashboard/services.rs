use std::sync::Arc;

use axum::extract::FromRef;
use time::{Duration, OffsetDateTime, Time};

use crate::{
    dashboard::dto::{DashboardStats, FraudReport, HeatmapBucket, TimePoint},
    error::AppResult,
    jobs::{repo::JobStore, repo_types::JobStatus},
    state::AppState,
    users::repo::UserStore,
    workers::{repo::WorkerStore, repo_types::VerificationStatus},
};

/// Read-only statistics, recomputed on every call.
#[derive(Clone)]
pub struct DashboardService {
    jobs: Arc<dyn JobStore>,
    users: Arc<dyn UserStore>,
    workers: Arc<dyn WorkerStore>,
}

impl FromRef<AppState> for DashboardService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.jobs.clone(), state.users.clone(), state.workers.clone())
    }
}

/// UTC midnight today and UTC midnight on the first of the month.
fn period_starts(now: OffsetDateTime) -> anyhow::Result<(OffsetDateTime, OffsetDateTime)> {
    let today = now.replace_time(Time::MIDNIGHT);
    let month = today.replace_day(1)?;
    Ok((today, month))
}

impl DashboardService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        users: Arc<dyn UserStore>,
        workers: Arc<dyn WorkerStore>,
    ) -> Self {
        Self {
            jobs,
            users,
            workers,
        }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        self.stats_at(OffsetDateTime::now_utc()).await
    }

    pub async fn stats_at(&self, now: OffsetDateTime) -> AppResult<DashboardStats> {
        let now = now.to_offset(time::UtcOffset::UTC);
        let (today, month) = period_starts(now)?;

        Ok(DashboardStats {
            total_jobs: self.jobs.count().await?,
            jobs_today: self.jobs.count_created_between(today, now).await?,
            jobs_this_month: self.jobs.count_created_between(month, now).await?,
            completed_jobs: self.jobs.count_completed_between(month, now).await?,
            active_jobs: self
                .jobs
                .count_by_statuses(&[JobStatus::Assigned, JobStatus::InProgress])
                .await?,
            total_users: self.users.count().await?,
            total_workers: self.workers.count().await?,
            verified_workers: self
                .workers
                .count_by_statuses(&[VerificationStatus::Verified])
                .await?,
            pending_verifications: self
                .workers
                .count_by_statuses(&VerificationStatus::PENDING)
                .await?,
            most_popular_category: self.jobs.most_popular_category().await?,
            timeseries: sample_timeseries(),
        })
    }
}

// Illustrative series for the admin charts; not derived from stored jobs.
fn sample_timeseries() -> Vec<TimePoint> {
    vec![
        TimePoint { date: "2025-08-01", jobs: 5 },
        TimePoint { date: "2025-08-02", jobs: 7 },
        TimePoint { date: "2025-08-03", jobs: 4 },
    ]
}

pub fn heatmap() -> Vec<HeatmapBucket> {
    vec![
        HeatmapBucket { lat: 28.6139, lng: 77.2090, count: 15 }, // Delhi
        HeatmapBucket { lat: 19.0760, lng: 72.8777, count: 12 }, // Mumbai
        HeatmapBucket { lat: 12.9716, lng: 77.5946, count: 8 },  // Bangalore
    ]
}

pub fn fraud_reports(now: OffsetDateTime) -> Vec<FraudReport> {
    vec![FraudReport {
        id: 1,
        reported_user: "user@example.com".into(),
        reason: "Fake job posting".into(),
        status: "PENDING".into(),
        created_at: now - Duration::days(1),
    }]
}
