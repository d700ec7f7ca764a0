use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of an admin verification review, as told to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationDecision {
    Approved,
    Rejected { reason: Option<String> },
}

/// Outbound notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tells a client which worker now holds their job.
    async fn send_job_accepted(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        worker_name: &str,
    ) -> anyhow::Result<()>;

    async fn send_verification_decision(
        &self,
        user_id: Uuid,
        decision: VerificationDecision,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    JobAccepted {
        user_id: Uuid,
        job_id: Uuid,
        worker_name: String,
    },
    VerificationDecision {
        user_id: Uuid,
        decision: VerificationDecision,
    },
}

/// Fire-and-forget delivery: the caller never waits and a failure is only logged.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        let res = match &notification {
            Notification::JobAccepted {
                user_id,
                job_id,
                worker_name,
            } => notifier.send_job_accepted(*user_id, *job_id, worker_name).await,
            Notification::VerificationDecision { user_id, decision } => {
                notifier
                    .send_verification_decision(*user_id, decision.clone())
                    .await
            }
        };
        match res {
            Ok(()) => debug!(?notification, "notification delivered"),
            Err(e) => warn!(error = %e, ?notification, "notification delivery failed"),
        }
    });
}

/// Persists notifications for in-app delivery.
#[derive(Clone)]
pub struct PgNotifier {
    db: PgPool,
}

impl PgNotifier {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn insert(&self, user_id: Uuid, kind: &str, payload: serde_json::Value) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind)
        .bind(payload)
        .execute(&self.db)
        .await
        .with_context(|| format!("insert {} notification", kind))?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for PgNotifier {
    async fn send_job_accepted(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        worker_name: &str,
    ) -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "jobId": job_id,
            "workerName": worker_name,
            "message": format!("{} has been assigned to your job", worker_name),
        });
        self.insert(user_id, "JOB_ACCEPTED", payload).await
    }

    async fn send_verification_decision(
        &self,
        user_id: Uuid,
        decision: VerificationDecision,
    ) -> anyhow::Result<()> {
        let message = match &decision {
            VerificationDecision::Approved => "You are verified. Start exploring jobs.".to_string(),
            VerificationDecision::Rejected { reason: Some(r) } => {
                format!("Your verification was rejected: {}", r)
            }
            VerificationDecision::Rejected { reason: None } => {
                "Your verification was rejected.".to_string()
            }
        };
        let mut payload = serde_json::to_value(&decision)?;
        payload["message"] = serde_json::Value::String(message);
        self.insert(user_id, "WORKER_VERIFICATION", payload).await
    }
}

#[cfg(test)]
pub use testing::{FailingNotifier, RecordingNotifier};

#[cfg(test)]
mod testing {
    use super::*;
    use tokio::sync::mpsc;

    /// Forwards every notification to a channel the test can await on.
    pub struct RecordingNotifier {
        tx: mpsc::UnboundedSender<Notification>,
    }

    impl RecordingNotifier {
        pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Self { tx }, rx)
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_job_accepted(
            &self,
            user_id: Uuid,
            job_id: Uuid,
            worker_name: &str,
        ) -> anyhow::Result<()> {
            let _ = self.tx.send(Notification::JobAccepted {
                user_id,
                job_id,
                worker_name: worker_name.to_string(),
            });
            Ok(())
        }

        async fn send_verification_decision(
            &self,
            user_id: Uuid,
            decision: VerificationDecision,
        ) -> anyhow::Result<()> {
            let _ = self
                .tx
                .send(Notification::VerificationDecision { user_id, decision });
            Ok(())
        }
    }

    pub struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_job_accepted(&self, _: Uuid, _: Uuid, _: &str) -> anyhow::Result<()> {
            anyhow::bail!("sink unavailable")
        }

        async fn send_verification_decision(
            &self,
            _: Uuid,
            _: VerificationDecision,
        ) -> anyhow::Result<()> {
            anyhow::bail!("sink unavailable")
        }
    }
}
