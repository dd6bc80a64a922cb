use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::app::push::{Delivery, PushGateway};
use crate::config::PushConfig;
use crate::domain::notification::{NotificationMessage, ACTIVITY_PAYLOAD_TYPE};

const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    recipients: &'a [String],
    notification: PushNotification<'a>,
    data: PushData,
    priority: &'static str,
}

#[derive(Debug, Serialize)]
struct PushNotification<'a> {
    title: &'a str,
    body: &'a str,
    sound: &'static str,
    badge: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushData {
    #[serde(rename = "type")]
    kind: &'static str,
    subject_id: Uuid,
    click_action: &'static str,
}

/// HTTP client for the push gateway. One POST per token batch.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: Client,
    gateway_url: Url,
    server_key: Option<String>,
}

impl HttpPushGateway {
    pub fn new(gateway_url: Url, server_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            gateway_url,
            server_key,
        })
    }

    pub fn from_config(config: &PushConfig) -> Result<Self> {
        Self::new(
            config.gateway_url.clone(),
            config.server_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.server_key.is_some()
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send(
        &self,
        tokens: &[String],
        message: &NotificationMessage,
        subject_id: Uuid,
    ) -> Result<Delivery> {
        if tokens.is_empty() {
            return Err(anyhow!("push batch has no device tokens"));
        }

        let Some(server_key) = self.server_key.as_deref() else {
            tracing::debug!(
                tokens = tokens.len(),
                subject_id = %subject_id,
                title = %message.title,
                body = %message.body,
                "push gateway not configured, notification not sent"
            );
            return Ok(Delivery::Suppressed);
        };

        let request = PushRequest {
            recipients: tokens,
            notification: PushNotification {
                title: &message.title,
                body: &message.body,
                sound: "default",
                badge: "1",
            },
            data: PushData {
                kind: ACTIVITY_PAYLOAD_TYPE,
                subject_id,
                click_action: CLICK_ACTION,
            },
            priority: "high",
        };

        let response = self
            .client
            .post(self.gateway_url.clone())
            .header(AUTHORIZATION, format!("key={}", server_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| anyhow!("push gateway request failed: {}", err))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("push gateway returned {}: {}", status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| anyhow!("push gateway returned an invalid body: {}", err))?;

        tracing::debug!(
            tokens = tokens.len(),
            subject_id = %subject_id,
            response = %body,
            "push notification sent"
        );
        Ok(Delivery::Sent)
    }
}
