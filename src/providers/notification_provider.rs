use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;

/// Messages the lifecycle sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    /// Welcome mail with login email and temporary password
    NewEmployee,
    /// KYC approval with the permanent employee code
    KycApproved,
}

impl NotificationTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewEmployee => "new_employee",
            Self::KycApproved => "kyc_approved",
        }
    }
}

/// Delivery result; senders report failures here instead of erroring
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Outbound notification channel
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, to: &str, template: NotificationTemplate, payload: Value) -> NotificationResult;
}

/// Writes notifications to the log; used when no delivery endpoint is configured
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, to: &str, template: NotificationTemplate, _payload: Value) -> NotificationResult {
        tracing::info!("Notification {} for {} (delivery endpoint not configured)", template.as_str(), to);
        NotificationResult::sent()
    }
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    template: &'a str,
    payload: Value,
}

/// Posts notifications as JSON to an external mail relay
pub struct HttpNotificationSender {
    client: Client,
    endpoint: String,
    from: String,
}

impl HttpNotificationSender {
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new()
            .user_agent("staffdesk/1.0 (+reqwest)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    async fn send(&self, to: &str, template: NotificationTemplate, payload: Value) -> NotificationResult {
        let message = OutboundMessage {
            from: &self.from,
            to,
            template: template.as_str(),
            payload,
        };

        let response = match self.client.post(&self.endpoint).json(&message).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Notification {} to {} failed: {}", template.as_str(), to, e);
                return NotificationResult::failed(format!("send failed: {e}"));
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Notification {} delivered to {}", template.as_str(), to);
            NotificationResult::sent()
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Notification relay returned HTTP {}: {}", status, body);
            NotificationResult::failed(format!("HTTP {status}: {body}"))
        }
    }
}
