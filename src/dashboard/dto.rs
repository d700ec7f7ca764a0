use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub jobs_today: i64,
    pub jobs_this_month: i64,
    pub completed_jobs: i64,
    pub active_jobs: i64,
    pub total_users: i64,
    pub total_workers: i64,
    pub verified_workers: i64,
    pub pending_verifications: i64,
    pub most_popular_category: Option<String>,
    pub timeseries: Vec<TimePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimePoint {
    pub date: &'static str,
    pub jobs: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapBucket {
    pub lat: f64,
    pub lng: f64,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudReport {
    pub id: i64,
    pub reported_user: String,
    pub reason: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
