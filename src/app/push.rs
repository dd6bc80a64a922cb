use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notification::NotificationMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The gateway accepted the batch.
    Sent,
    /// No gateway credential is configured; the delivery was only logged.
    Suppressed,
}

/// Delivers one notification to one recipient's batch of device tokens.
///
/// Implementations make at most one transport call per invocation and never retry.
/// Timeouts, non-success statuses and malformed responses are returned as errors.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        tokens: &[String],
        message: &NotificationMessage,
        subject_id: Uuid,
    ) -> Result<Delivery>;
}
