use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

use crate::config::MailConfig;
use crate::domain::ports::MailService;
use crate::utils::error::{CityInfoError, Result};

/// Writes mails to the log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LocalMailService {
    to: String,
    from: String,
}

impl LocalMailService {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            to: config.to.clone(),
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl MailService for LocalMailService {
    async fn send(&self, subject: &str, message: &str) -> Result<()> {
        tracing::info!(
            to = %self.to,
            from = %self.from,
            subject,
            "Mail from {} to {}, with LocalMailService. {}",
            self.from,
            self.to,
            message
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MailPayload<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    message: &'a str,
    sent_at: DateTime<Utc>,
}

/// POSTs every mail as JSON to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookMailService {
    client: Client,
    endpoint: String,
    to: String,
    from: String,
}

impl WebhookMailService {
    pub fn new(endpoint: impl Into<String>, config: &MailConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            to: config.to.clone(),
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl MailService for WebhookMailService {
    async fn send(&self, subject: &str, message: &str) -> Result<()> {
        let payload = MailPayload {
            to: &self.to,
            from: &self.from,
            subject,
            message,
            sent_at: Utc::now(),
        };

        tracing::debug!("Posting mail notification to: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CityInfoError::NotificationError {
                message: format!("webhook responded with {}", status),
            });
        }

        Ok(())
    }
}

/// Picks the webhook mailer when `mail.webhook_url` is set.
pub fn mail_service_from_config(config: &MailConfig) -> Arc<dyn MailService> {
    match &config.webhook_url {
        Some(url) => {
            tracing::info!("Mail notifications go to webhook {}", url);
            Arc::new(WebhookMailService::new(url.clone(), config))
        }
        None => Arc::new(LocalMailService::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_mail_service_always_succeeds() {
        let service = LocalMailService::new(&MailConfig::default());
        assert!(service.send("subject", "body").await.is_ok());
    }
}
