use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::corpus::split::DEFAULT_TRAIN_RATIO;
use crate::features::{FeatureEncoder, VocabularySize};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Both the
/// corpus builder and the email classifier get their encoder from
/// `feature_encoder()`, so they can't disagree on the vocabulary size.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hash space size shared by training and inference (default 9013)
    pub vocabulary_size: VocabularySize,
    /// URL of the hosted model endpoint
    pub endpoint_url: String,
    /// Optional webhook that relays verdict notifications as email.
    /// When unset, notifications are only printed.
    pub notify_url: Option<String>,
    /// Recipients of verdict notifications
    pub notify_to: Vec<String>,
    /// Where the corpus and the encoded datasets live
    pub dataset_dir: PathBuf,
    /// Fraction of the corpus used for training (default 0.8)
    pub train_ratio: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A malformed vocabulary size or train ratio is an error here rather
    /// than silently falling back to the default.
    pub fn load() -> Result<Self> {
        let vocabulary_size = match env::var("SPAMFILTER_VOCABULARY_SIZE") {
            Ok(raw) => raw
                .parse::<VocabularySize>()
                .context("SPAMFILTER_VOCABULARY_SIZE is invalid")?,
            Err(_) => VocabularySize::default(),
        };

        let train_ratio = match env::var("SPAMFILTER_TRAIN_RATIO") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("SPAMFILTER_TRAIN_RATIO is not a number: {raw:?}"))?,
            Err(_) => DEFAULT_TRAIN_RATIO,
        };

        let dataset_dir = env::var("SPAMFILTER_DATASET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::corpus::download::default_dataset_dir());

        Ok(Self {
            vocabulary_size,
            endpoint_url: env::var("SPAMFILTER_ENDPOINT_URL").unwrap_or_default(),
            notify_url: env::var("SPAMFILTER_NOTIFY_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            notify_to: parse_recipients(&env::var("SPAMFILTER_NOTIFY_TO").unwrap_or_default()),
            dataset_dir,
            train_ratio,
        })
    }

    /// The one encoder both stages must use.
    pub fn feature_encoder(&self) -> FeatureEncoder {
        FeatureEncoder::new(self.vocabulary_size)
    }

    /// Check that the model endpoint is configured.
    /// Call this before any operation that classifies email.
    pub fn require_endpoint(&self) -> Result<()> {
        if self.endpoint_url.is_empty() {
            anyhow::bail!(
                "SPAMFILTER_ENDPOINT_URL not set. Add it to your .env file.\n\
                 It should point at the hosted model's invocation URL."
            );
        }
        Ok(())
    }

    /// Check that the train ratio is usable.
    pub fn require_train_ratio(&self) -> Result<()> {
        if !(self.train_ratio > 0.0 && self.train_ratio <= 1.0) {
            anyhow::bail!(
                "SPAMFILTER_TRAIN_RATIO must be in (0, 1], got {}",
                self.train_ratio
            );
        }
        Ok(())
    }
}

/// Split a comma-separated recipient list, dropping blanks.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            vocabulary_size: VocabularySize::default(),
            endpoint_url: String::new(),
            notify_url: None,
            notify_to: Vec::new(),
            dataset_dir: PathBuf::from("/tmp/spamfilter"),
            train_ratio: 0.8,
        }
    }

    #[test]
    fn test_parse_recipients() {
        assert_eq!(
            parse_recipients(" a@x.com, ,b@y.org ,"),
            vec!["a@x.com".to_string(), "b@y.org".to_string()]
        );
        assert!(parse_recipients("").is_empty());
    }

    #[test]
    fn test_require_endpoint() {
        let mut c = config();
        assert!(c.require_endpoint().is_err());
        c.endpoint_url = "http://localhost:8080/invocations".to_string();
        assert!(c.require_endpoint().is_ok());
    }

    #[test]
    fn test_require_train_ratio() {
        let mut c = config();
        assert!(c.require_train_ratio().is_ok());
        c.train_ratio = 0.0;
        assert!(c.require_train_ratio().is_err());
    }

    #[test]
    fn test_feature_encoder_uses_configured_size() {
        let mut c = config();
        c.vocabulary_size = VocabularySize::new(42).unwrap();
        assert_eq!(c.feature_encoder().vocabulary().get(), 42);
    }
}
