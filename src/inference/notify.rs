// Verdict notifications: report composition and delivery.
//
// The Notifier trait keeps delivery swappable: LogNotifier prints the report
// locally, WebhookNotifier POSTs it as JSON to a mail relay.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Serialize;
use tracing::info;

use super::email::EmailMessage;
use super::endpoint::Prediction;
use crate::output::truncate_chars;

/// How many characters of the body are quoted back in the report.
pub const BODY_SAMPLE_CHARS: usize = 240;

/// A composed verdict message, ready to deliver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Render the Date header as `YYYY-MM-DD HH:MM:SS +ZZZZ` when it parses as
/// RFC 2822, otherwise return it unchanged.
pub fn format_received_date(date: Option<&str>) -> String {
    match date {
        Some(raw) => DateTime::parse_from_rfc2822(raw.trim())
            .map(|d| d.format("%Y-%m-%d %H:%M:%S %z").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => "an unknown time".to_string(),
    }
}

/// Build the reply describing how `email` was classified.
pub fn compose_report(
    email: &EmailMessage,
    prediction: &Prediction,
    recipients: &[String],
) -> Notification {
    let subject = email.subject.clone().unwrap_or_default();
    let sample = truncate_chars(&email.body, BODY_SAMPLE_CHARS);

    let body = format!(
        "We have received your email sent at {date} with the subject:\n\
         {subject}.\n\
         \n\
         Here is a {BODY_SAMPLE_CHARS} character sample of the email body:\n\
         {sample}\n\
         \n\
         The email was classified as {label} with a {probability:.4} confidence.",
        date = format_received_date(email.date.as_deref()),
        label = prediction.label,
        probability = prediction.probability,
    );

    Notification {
        to: recipients.to_vec(),
        subject,
        body,
    }
}

/// Writes notifications to the terminal and the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        info!(
            to = ?notification.to,
            subject = %notification.subject,
            "Verdict notification (log only)"
        );
        crate::output::terminal::display_notification(notification);
        Ok(())
    }
}

/// POSTs notifications as JSON (`{to, subject, body}`) to a relay URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("spamfilter/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .context("Failed to call notification webhook")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Notification webhook returned {}: {}", status, body);
        }

        info!(to = ?notification.to, "Sent verdict notification");
        Ok(())
    }
}
