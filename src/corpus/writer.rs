// Gzip CSV writer for encoded feature rows.
//
// Layout per line, no header and no index column:
//   label,f0,f1,...,fN-1
// with the label as an integer and every feature written as 0.0 or 1.0.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::ProgressBar;

use super::dataset::LabeledMessage;
use crate::features::{FeatureEncoder, TokenHasher};

/// Write one CSV line for an already-encoded row.
pub fn write_row<W: Write>(out: &mut W, label: u8, row: &[f64]) -> std::io::Result<()> {
    write!(out, "{label}")?;
    for &value in row {
        out.write_all(if value == 1.0 { b",1.0" } else { b",0.0" })?;
    }
    out.write_all(b"\n")
}

/// Encode `messages` one at a time and write them as gzip CSV to `path`.
///
/// Rows are streamed, so memory stays at one row regardless of corpus size.
/// Returns the number of rows written.
pub fn write_feature_rows<H: TokenHasher>(
    path: &Path,
    messages: &[LabeledMessage],
    encoder: &FeatureEncoder<H>,
    progress: Option<&ProgressBar>,
) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut gz = GzEncoder::new(BufWriter::new(file), Compression::default());

    for message in messages {
        let row = encoder.encode_row(&message.text);
        write_row(&mut gz, message.label.value(), &row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let mut inner = gz
        .finish()
        .with_context(|| format!("Failed to finish gzip stream for {}", path.display()))?;
    inner
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(messages.len())
}
