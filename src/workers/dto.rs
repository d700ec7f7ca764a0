use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workers::repo_types::{Document, DocumentType, VerificationStatus};

#[derive(Debug, Default, Deserialize)]
pub struct RejectWorkerRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RejectWorkerResponse {
    pub message: String,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_url: String,
    pub verification_status: VerificationStatus,
}

impl From<Document> for DocumentView {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            doc_type: d.doc_type,
            file_url: d.file_url,
            verification_status: d.verification_status,
        }
    }
}

/// Worker awaiting review, with everything the reviewer needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWorker {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub verification_status: VerificationStatus,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub address: Option<String>,
    pub documents: Vec<DocumentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedWorker {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub verification_status: VerificationStatus,
}
