// Composition tests: the training and inference paths must agree.
//
// A message written to the training set and the same message arriving as an
// email body must produce the identical feature row:
//   corpus -> gzip CSV row   vs   email -> body -> endpoint payload

use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use flate2::read::GzDecoder;

use spamfilter::config::Config;
use spamfilter::corpus::builder::build_dataset;
use spamfilter::corpus::dataset::{parse_collection, Label};
use spamfilter::features::{FeatureMatrix, VocabularySize};
use spamfilter::inference::endpoint::{parse_predictions, ModelEndpoint, Prediction};
use spamfilter::inference::handler::EmailHandler;
use spamfilter::inference::notify::{Notification, Notifier};

fn config(n: usize) -> Config {
    Config {
        vocabulary_size: VocabularySize::new(n).unwrap(),
        endpoint_url: "http://localhost/invocations".to_string(),
        notify_url: None,
        notify_to: vec!["me@example.org".to_string()],
        dataset_dir: PathBuf::from("unused"),
        train_ratio: 1.0,
    }
}

/// Serves predictions the way the hosted model would: from a JSON body.
struct JsonEndpoint {
    payloads: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl ModelEndpoint for JsonEndpoint {
    async fn invoke(&self, features: &FeatureMatrix) -> Result<Vec<Prediction>> {
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::to_string(features)?);
        parse_predictions(r#"{"predicted_label": [[1.0]], "predicted_probability": [[0.99]]}"#)
    }
}

struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn training_row_equals_inference_payload() {
    let config = config(64);
    let message = "free entry in 2 a wkly comp to win fa cup final tkts 21st may 2005.";

    // Training side
    let dir = tempfile::tempdir().unwrap();
    let messages = parse_collection(&format!("spam\t{message}\n")).unwrap();
    let summary = build_dataset(
        messages,
        dir.path(),
        &config.feature_encoder(),
        config.train_ratio,
        false,
    )
    .unwrap();

    let mut csv = String::new();
    GzDecoder::new(std::fs::File::open(&summary.train_path).unwrap())
        .read_to_string(&mut csv)
        .unwrap();
    let training_row: Vec<f64> = csv
        .trim_end()
        .split(',')
        .skip(1)
        .map(|v| v.parse().unwrap())
        .collect();

    // Inference side: the same text as an email body
    let encoder = config.feature_encoder();
    let endpoint = JsonEndpoint {
        payloads: std::sync::Mutex::new(Vec::new()),
    };
    let handler = EmailHandler::new(&encoder, &endpoint, &NullNotifier, config.notify_to.clone());
    let raw = format!("Subject: prize\r\n\r\n{message}\r\n");
    let verdict = handler.handle(raw.as_bytes()).await.unwrap();

    let payload: Vec<Vec<f64>> =
        serde_json::from_str(&endpoint.payloads.lock().unwrap()[0]).unwrap();

    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0], training_row);
    assert_eq!(verdict.prediction.label, Label::Spam);
}

#[test]
fn different_vocabulary_sizes_break_parity() {
    let text = "urgent call now to claim your prize";
    let a = config(9013).feature_encoder().encode(&[text]);
    let b = config(9014).feature_encoder().encode(&[text]);
    assert_ne!(a.shape(), b.shape());
    assert_ne!(a.active_indices(0), b.active_indices(0));
}

#[test]
fn email_normalization_does_not_change_features() {
    // The email collaborator lowercases and whitespace-joins the body before
    // encoding; the tokenizer must make that a no-op for the features.
    let encoder = config(9013).feature_encoder();
    let raw = "WINNER!!\tAs a valued   network customer\nyou have been SELECTED";
    let normalized = spamfilter::inference::email::normalize_body(raw);
    assert_eq!(encoder.encode(&[raw]), encoder.encode(&[normalized.as_str()]));
}
