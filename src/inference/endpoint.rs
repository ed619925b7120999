// Hosted model endpoint: the trait, an HTTP client, and the output contract.
//
// Input contract: a JSON array of feature rows, `[[0.0, 1.0, ...], ...]`.
// Output contract: `{"predicted_label": [[1.0]], "predicted_probability": [[0.97]]}`,
// one inner array per input row.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::dataset::Label;
use crate::features::FeatureMatrix;

/// The model's verdict for one feature row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    /// Model confidence for `label`, 0.0 to 1.0.
    pub probability: f64,
}

/// Anything that turns feature rows into predictions.
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    /// Classify every row of `features`, returning predictions in row order.
    async fn invoke(&self, features: &FeatureMatrix) -> Result<Vec<Prediction>>;
}

/// Model served behind an HTTP POST that speaks the JSON contract above.
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
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
impl ModelEndpoint for HttpEndpoint {
    async fn invoke(&self, features: &FeatureMatrix) -> Result<Vec<Prediction>> {
        let body = serde_json::to_vec(features).context("Failed to serialize feature rows")?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to call model endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Model endpoint returned {}: {}", status, body);
        }

        let text = response
            .text()
            .await
            .context("Failed to read model endpoint response")?;
        debug!(response = %text, "Model endpoint responded");

        let predictions = parse_predictions(&text)?;
        if predictions.len() != features.rows() {
            anyhow::bail!(
                "Model endpoint returned {} predictions for {} rows",
                predictions.len(),
                features.rows()
            );
        }

        Ok(predictions)
    }
}

#[derive(Deserialize)]
struct EndpointOutput {
    predicted_label: Vec<Vec<f64>>,
    predicted_probability: Vec<Vec<f64>>,
}

/// Parse the endpoint's output contract.
///
/// A label value of 1 means spam; anything else is ham. Only the first
/// element of each inner array is used.
pub fn parse_predictions(body: &str) -> Result<Vec<Prediction>> {
    let output: EndpointOutput =
        serde_json::from_str(body).context("Failed to parse model endpoint response")?;

    if output.predicted_label.len() != output.predicted_probability.len() {
        anyhow::bail!(
            "predicted_label has {} rows but predicted_probability has {}",
            output.predicted_label.len(),
            output.predicted_probability.len()
        );
    }

    output
        .predicted_label
        .iter()
        .zip(&output.predicted_probability)
        .enumerate()
        .map(|(i, (labels, probabilities))| {
            let (Some(&label), Some(&probability)) = (labels.first(), probabilities.first())
            else {
                anyhow::bail!("Model endpoint returned an empty prediction for row {i}");
            };
            let label = if label as i64 == 1 {
                Label::Spam
            } else {
                Label::Ham
            };
            Ok(Prediction { label, probability })
        })
        .collect()
}
