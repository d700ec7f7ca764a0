use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Review state shared by worker profiles and their documents.
///
/// Legacy data used both `APPROVED` and `VERIFIED` for the same state; it is
/// read as `Verified` and always written back as `VERIFIED`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "verification_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    PendingBasic,
    PendingFull,
    #[serde(alias = "APPROVED")]
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const PENDING: [VerificationStatus; 2] =
        [VerificationStatus::PendingBasic, VerificationStatus::PendingFull];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::PendingBasic => "PENDING_BASIC",
            VerificationStatus::PendingFull => "PENDING_FULL",
            VerificationStatus::Verified => "VERIFIED",
            VerificationStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "document_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Aadhaar,
    Pan,
    Photo,
    AddressProof,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub verification_status: VerificationStatus,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub address: Option<String>,
    pub rating_avg: f64,
    pub rating_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub doc_type: DocumentType,
    pub file_url: String,
    pub verification_status: VerificationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewWorkerProfile {
    pub user_id: Uuid,
    pub verification_status: VerificationStatus,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub address: Option<String>,
    pub rating_avg: f64,
    pub rating_count: i32,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub worker_id: Uuid,
    pub doc_type: DocumentType,
    pub file_url: String,
}
