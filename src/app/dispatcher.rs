use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{timeout_at, Instant};
use uuid::Uuid;

use crate::app::composer::{compose, UNKNOWN_ACTOR};
use crate::app::devices::DeviceRegistry;
use crate::app::preferences::PreferenceResolver;
use crate::app::push::{Delivery, PushGateway};
use crate::app::store::NotificationStore;
use crate::config::NotifyConfig;
use crate::domain::notification::{ActivityAction, ActivityEvent, NotificationMessage};
use crate::domain::user::Recipient;

/// What happened to one recipient during a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecipientOutcome {
    Delivered,
    Suppressed,
    OptedOut,
    NoEndpoints,
    LookupFailed,
    DeliveryFailed,
}

/// Tally of one dispatch, for logging and tests. Not a success signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub candidates: usize,
    pub delivered: usize,
    pub suppressed: usize,
    pub opted_out: usize,
    pub no_endpoints: usize,
    pub lookup_failed: usize,
    pub delivery_failed: usize,
    /// Recipients still pending or in flight when the budget ran out, or whose task panicked.
    pub abandoned: usize,
}

impl DispatchSummary {
    fn record(&mut self, outcome: RecipientOutcome) {
        match outcome {
            RecipientOutcome::Delivered => self.delivered += 1,
            RecipientOutcome::Suppressed => self.suppressed += 1,
            RecipientOutcome::OptedOut => self.opted_out += 1,
            RecipientOutcome::NoEndpoints => self.no_endpoints += 1,
            RecipientOutcome::LookupFailed => self.lookup_failed += 1,
            RecipientOutcome::DeliveryFailed => self.delivery_failed += 1,
        }
    }

    fn settled(&self) -> usize {
        self.delivered
            + self.suppressed
            + self.opted_out
            + self.no_endpoints
            + self.lookup_failed
            + self.delivery_failed
    }
}

/// Fans an activity event out to every other user's devices.
///
/// Delivery is best-effort: nothing here returns an error to the mutation that
/// triggered it. Each recipient runs on its own task, at most
/// `max_concurrency` at a time, and the whole dispatch is cut off after
/// `budget_seconds`.
#[derive(Clone)]
pub struct ActivityDispatcher {
    store: Arc<dyn NotificationStore>,
    registry: DeviceRegistry,
    preferences: PreferenceResolver,
    gateway: Arc<dyn PushGateway>,
    config: NotifyConfig,
}

impl ActivityDispatcher {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        gateway: Arc<dyn PushGateway>,
        config: NotifyConfig,
    ) -> Self {
        Self {
            registry: DeviceRegistry::new(store.clone()),
            preferences: PreferenceResolver::new(store.clone()),
            store,
            gateway,
            config,
        }
    }

    /// Fire-and-forget entry point for mutation handlers. The returned handle
    /// may be dropped; the dispatch keeps running on the runtime.
    pub fn notify_activity(
        &self,
        actor_id: Uuid,
        action: impl Into<ActivityAction>,
        subject_label: impl Into<String>,
        subject_id: Uuid,
    ) -> JoinHandle<DispatchSummary> {
        let event = ActivityEvent {
            actor_id,
            action: action.into(),
            subject_label: subject_label.into(),
            subject_id,
        };
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.notify(event).await })
    }

    /// Runs one dispatch to completion or until the budget runs out. The
    /// budget starts here and covers the recipient lookups as well as delivery.
    pub async fn notify(&self, event: ActivityEvent) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        let deadline = Instant::now() + Duration::from_secs(self.config.budget_seconds);

        let Ok(actor_name) = timeout_at(deadline, self.actor_name(event.actor_id)).await else {
            self.log_budget_exceeded(&event, &summary);
            return summary;
        };

        let listed = match timeout_at(deadline, self.registry.list_all_except(event.actor_id)).await
        {
            Ok(listed) => listed,
            Err(_) => {
                self.log_budget_exceeded(&event, &summary);
                return summary;
            }
        };
        let candidates = match listed {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::error!(
                    error = ?err,
                    actor_id = %event.actor_id,
                    "failed to list notification recipients"
                );
                return summary;
            }
        };
        summary.candidates = candidates.len();
        if candidates.is_empty() {
            tracing::debug!(actor_id = %event.actor_id, "no notification recipients");
            return summary;
        }

        let message = Arc::new(compose(&event.action, &actor_name, &event.subject_label));
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut set = JoinSet::new();

        for recipient in candidates {
            let dispatcher = self.clone();
            let message = message.clone();
            let semaphore = semaphore.clone();
            let subject_id = event.subject_id;
            set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return RecipientOutcome::DeliveryFailed;
                };
                dispatcher.deliver_to(&recipient, &message, subject_id).await
            });
        }

        let drained = timeout_at(deadline, async {
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok(outcome) => summary.record(outcome),
                    Err(err) => {
                        tracing::error!(error = ?err, "notification task failed");
                        summary.abandoned += 1;
                    }
                }
            }
        })
        .await;

        if drained.is_err() {
            set.abort_all();
            summary.abandoned = summary.candidates - summary.settled();
            self.log_budget_exceeded(&event, &summary);
        }

        tracing::info!(
            action = %event.action,
            actor_id = %event.actor_id,
            subject_id = %event.subject_id,
            candidates = summary.candidates,
            delivered = summary.delivered,
            suppressed = summary.suppressed,
            opted_out = summary.opted_out,
            no_endpoints = summary.no_endpoints,
            lookup_failed = summary.lookup_failed,
            delivery_failed = summary.delivery_failed,
            abandoned = summary.abandoned,
            "activity notification dispatched"
        );
        summary
    }

    fn log_budget_exceeded(&self, event: &ActivityEvent, summary: &DispatchSummary) {
        tracing::warn!(
            budget_seconds = self.config.budget_seconds,
            candidates = summary.candidates,
            abandoned = summary.abandoned,
            subject_id = %event.subject_id,
            "notification budget exceeded, abandoning remaining deliveries"
        );
    }

    async fn actor_name(&self, actor_id: Uuid) -> String {
        match self.store.find_user_name(actor_id).await {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => UNKNOWN_ACTOR.to_string(),
            Err(err) => {
                tracing::warn!(error = ?err, actor_id = %actor_id, "failed to resolve actor name");
                UNKNOWN_ACTOR.to_string()
            }
        }
    }

    async fn deliver_to(
        &self,
        recipient: &Recipient,
        message: &NotificationMessage,
        subject_id: Uuid,
    ) -> RecipientOutcome {
        match self.preferences.is_enabled(recipient.id).await {
            Ok(true) => {}
            Ok(false) => return RecipientOutcome::OptedOut,
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    user_id = %recipient.id,
                    "failed to read notification preference, skipping recipient"
                );
                return RecipientOutcome::LookupFailed;
            }
        }

        let tokens: Vec<String> = match self.registry.list_for_user(recipient.id).await {
            Ok(endpoints) => endpoints.into_iter().map(|endpoint| endpoint.token).collect(),
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    user_id = %recipient.id,
                    "failed to list device endpoints, skipping recipient"
                );
                return RecipientOutcome::LookupFailed;
            }
        };
        if tokens.is_empty() {
            return RecipientOutcome::NoEndpoints;
        }

        match self.gateway.send(&tokens, message, subject_id).await {
            Ok(Delivery::Sent) => RecipientOutcome::Delivered,
            Ok(Delivery::Suppressed) => {
                tracing::info!(
                    to = %recipient.email,
                    tokens = tokens.len(),
                    title = %message.title,
                    "push delivery suppressed"
                );
                RecipientOutcome::Suppressed
            }
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    user_id = %recipient.id,
                    tokens = tokens.len(),
                    "push delivery failed"
                );
                RecipientOutcome::DeliveryFailed
            }
        }
    }
}
