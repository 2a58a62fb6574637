//! Email delivery for reminder notifications.
//!
//! The engine only sees the [`EmailTransport`] trait; [`ResendTransport`] is the
//! production implementation backed by the Resend HTTP API. Delivery is
//! attempted exactly once per call; retries are not this crate's concern.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use duewise_common::config::AppConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Errors raised while delivering a single email.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Email transport not configured: {0}")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Anything that can deliver an HTML email to one recipient.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError>;
}

/// Request body accepted by `POST /emails`.
#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Resend HTTP API transport.
pub struct ResendTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: Option<String>,
}

impl ResendTransport {
    pub fn new(api_key: Option<String>, from: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: RESEND_ENDPOINT.to_string(),
            api_key,
            from,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        if config.resend_api_key.is_none() {
            tracing::warn!("RESEND_API_KEY not set, every reminder send will fail");
        }
        if config.email_from.is_none() {
            tracing::warn!("EMAIL_FROM not set, every reminder send will fail");
        }
        Self::new(config.resend_api_key.clone(), config.email_from.clone())
    }

    /// Post to a different endpoint URL (e.g. a local mock).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        let from = self
            .from
            .as_deref()
            .ok_or(NotifyError::NotConfigured("missing sender address"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(NotifyError::NotConfigured("missing API key"))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&ResendEmail {
                from,
                to: [to],
                subject,
                html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to, subject, "Email accepted by Resend");
        Ok(())
    }
}
