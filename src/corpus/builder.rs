// Dataset build: load corpus, split, encode, write train/validation files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use super::dataset::{Label, LabeledMessage};
use super::split::split_train_validation;
use super::writer::write_feature_rows;
use crate::features::{FeatureEncoder, TokenHasher, VocabularySize};

pub const TRAIN_FILE: &str = "sms_train_set.gz";
pub const VALIDATION_FILE: &str = "sms_val_set.gz";

/// What a dataset build produced.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub vocabulary_size: VocabularySize,
    pub train_rows: usize,
    pub train_spam: usize,
    pub validation_rows: usize,
    pub validation_spam: usize,
    pub train_path: PathBuf,
    pub validation_path: PathBuf,
}

/// Split `messages`, encode them and write both gzip CSV files into `out_dir`.
///
/// Pass `show_progress = false` in tests and non-interactive runs.
pub fn build_dataset<H: TokenHasher>(
    messages: Vec<LabeledMessage>,
    out_dir: &Path,
    encoder: &FeatureEncoder<H>,
    train_ratio: f64,
    show_progress: bool,
) -> Result<DatasetSummary> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create dataset directory: {}", out_dir.display()))?;

    let total = messages.len() as u64;
    let (train, validation) = split_train_validation(messages, train_ratio)?;

    let pb = if show_progress {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("    [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})")
                .expect("valid template")
                .progress_chars("=> "),
        );
        Some(pb)
    } else {
        None
    };

    let train_path = out_dir.join(TRAIN_FILE);
    let validation_path = out_dir.join(VALIDATION_FILE);

    write_feature_rows(&train_path, &train, encoder, pb.as_ref())?;
    write_feature_rows(&validation_path, &validation, encoder, pb.as_ref())?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let summary = DatasetSummary {
        vocabulary_size: encoder.vocabulary(),
        train_rows: train.len(),
        train_spam: count_spam(&train),
        validation_rows: validation.len(),
        validation_spam: count_spam(&validation),
        train_path,
        validation_path,
    };

    info!(
        vocabulary_size = %summary.vocabulary_size,
        train_rows = summary.train_rows,
        validation_rows = summary.validation_rows,
        "Wrote encoded dataset"
    );

    Ok(summary)
}

fn count_spam(messages: &[LabeledMessage]) -> usize {
    messages.iter().filter(|m| m.label == Label::Spam).count()
}
