// SMS Spam Collection download helper.
//
// Fetches the UCI zip archive and extracts the tab-separated corpus file.
// Files are stored in a platform-appropriate directory
// (~/.local/share/spamfilter/dataset/ on Linux) so they persist across runs.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// UCI archive containing the corpus.
const COLLECTION_ZIP_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/00228/smsspamcollection.zip";

/// Name of the corpus file inside the archive and on disk.
pub const COLLECTION_FILE: &str = "SMSSpamCollection";

/// Returns the default directory for dataset files.
pub fn default_dataset_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spamfilter")
        .join("dataset")
}

pub fn collection_path(dir: &Path) -> PathBuf {
    dir.join(COLLECTION_FILE)
}

pub fn collection_present(dir: &Path) -> bool {
    collection_path(dir).exists()
}

/// Download and extract the corpus into `dir`. Skips the download when the
/// corpus file already exists. Returns the corpus path.
pub async fn download_collection(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create dataset directory: {}", dir.display()))?;

    let dest = collection_path(dir);
    if dest.exists() {
        info!("Corpus already exists, skipping download");
        println!("  {} (already exists)", COLLECTION_FILE);
        return Ok(dest);
    }

    println!("  Downloading {}...", COLLECTION_ZIP_URL);
    let archive = fetch_archive(COLLECTION_ZIP_URL).await?;
    extract_collection(&archive, &dest)?;

    info!("Extracted {} to {}", COLLECTION_FILE, dest.display());
    Ok(dest)
}

/// Pull `COLLECTION_FILE` out of an in-memory zip archive into `dest`.
pub fn extract_collection(archive: &[u8], dest: &Path) -> Result<()> {
    let mut zip =
        zip::ZipArchive::new(Cursor::new(archive)).context("Downloaded file is not a zip archive")?;
    let mut entry = zip
        .by_name(COLLECTION_FILE)
        .with_context(|| format!("{COLLECTION_FILE} not found in archive"))?;

    let mut out = std::fs::File::create(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    std::io::copy(&mut entry, &mut out)
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    Ok(())
}

async fn fetch_archive(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner} {bytes}")
            .expect("valid template"),
    );

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response body")?;

    pb.set_position(bytes.len() as u64);
    pb.finish_and_clear();

    Ok(bytes.to_vec())
}
