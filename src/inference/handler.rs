// Per-event email classification.
//
// One inbound email in, one verdict notification out. Failures are logged
// here at the event boundary and then returned, so the caller decides
// whether a bad email aborts the batch.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use super::email::{parse_email_bytes, EmailMessage};
use super::endpoint::{ModelEndpoint, Prediction};
use super::notify::{compose_report, Notification, Notifier};
use crate::features::{FeatureEncoder, TokenHasher};

/// Outcome of classifying one email.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub email: EmailMessage,
    pub prediction: Prediction,
    /// Distinct feature indices set for the body.
    pub active_features: usize,
    pub notification: Notification,
}

/// Wires the encoder, the model endpoint and the notifier together.
pub struct EmailHandler<'a, H: TokenHasher> {
    encoder: &'a FeatureEncoder<H>,
    endpoint: &'a dyn ModelEndpoint,
    notifier: &'a dyn Notifier,
    recipients: Vec<String>,
}

impl<'a, H: TokenHasher> EmailHandler<'a, H> {
    pub fn new(
        encoder: &'a FeatureEncoder<H>,
        endpoint: &'a dyn ModelEndpoint,
        notifier: &'a dyn Notifier,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            encoder,
            endpoint,
            notifier,
            recipients,
        }
    }

    /// Classify a raw email and send the verdict notification.
    pub async fn handle(&self, raw: &[u8]) -> Result<Verdict> {
        match self.classify(raw).await {
            Ok(verdict) => Ok(verdict),
            Err(e) => {
                error!(error = %format!("{e:#}"), "Email classification failed");
                Err(e)
            }
        }
    }

    async fn classify(&self, raw: &[u8]) -> Result<Verdict> {
        let email = parse_email_bytes(raw).context("Failed to read email")?;

        info!(
            from = email.from.as_deref().unwrap_or("?"),
            subject = email.subject.as_deref().unwrap_or(""),
            body_chars = email.body.chars().count(),
            "Parsed inbound email"
        );

        let features = self.encoder.encode(&[email.body.as_str()]);
        let active_features = features.active_indices(0).len();

        let prediction = self
            .endpoint
            .invoke(&features)
            .await?
            .into_iter()
            .next()
            .context("Model endpoint returned no prediction")?;

        info!(
            label = %prediction.label,
            probability = prediction.probability,
            active_features,
            "Classified email"
        );

        let notification = compose_report(&email, &prediction, &self.recipients);
        self.notifier
            .send(&notification)
            .await
            .context("Failed to send verdict notification")?;

        Ok(Verdict {
            email,
            prediction,
            active_features,
            notification,
        })
    }
}
