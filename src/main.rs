use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use spamfilter::config::Config;
use spamfilter::corpus;
use spamfilter::features::tokenize;
use spamfilter::inference::endpoint::HttpEndpoint;
use spamfilter::inference::handler::EmailHandler;
use spamfilter::inference::notify::{LogNotifier, Notifier, WebhookNotifier};
use spamfilter::output::terminal;

/// spamfilter: hashing-trick spam classification.
///
/// Builds multi-hot training data from a labeled SMS corpus and classifies
/// inbound email against a hosted model using the same encoding.
#[derive(Parser)]
#[command(name = "spamfilter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a text is tokenized and hashed
    Encode {
        /// The text to encode
        text: String,

        /// Print the endpoint JSON payload instead of the token table
        #[arg(long)]
        json: bool,
    },

    /// Download the SMS Spam Collection corpus
    DownloadDataset,

    /// Encode the corpus into gzip CSV train/validation sets
    BuildDataset {
        /// Corpus file (default: SMSSpamCollection in the dataset directory)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory (default: the dataset directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Classify raw email files and send verdict notifications
    Classify {
        /// One or more raw email files (.eml)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of emails to classify in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: u32,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spamfilter=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { text, json } => {
            let config = Config::load()?;
            let encoder = config.feature_encoder();

            if json {
                let matrix = encoder.encode(&[text.as_str()]);
                println!("{}", serde_json::to_string(&matrix)?);
                return Ok(());
            }

            let tokens = tokenize(&text, encoder.tokenizer());
            let indices = encoder.hashing_trick(&text);
            terminal::display_encoding(&text, &tokens, &indices, encoder.vocabulary().get());
        }

        Commands::DownloadDataset => {
            let config = Config::load()?;

            println!("Downloading SMS Spam Collection...");
            println!("  Destination: {}", config.dataset_dir.display());

            let path = corpus::download::download_collection(&config.dataset_dir).await?;

            println!("\n{}", "Corpus ready.".bold());
            println!("  {}", path.display());
            println!("You can now run `spamfilter build-dataset`.");
        }

        Commands::BuildDataset { input, out_dir } => {
            let config = Config::load()?;
            config.require_train_ratio()?;

            let input =
                input.unwrap_or_else(|| corpus::download::collection_path(&config.dataset_dir));
            if !input.exists() {
                anyhow::bail!(
                    "Corpus not found at {}\n\
                     Run `spamfilter download-dataset` first, or pass --input.",
                    input.display()
                );
            }
            let out_dir = out_dir.unwrap_or_else(|| config.dataset_dir.clone());

            println!("Encoding corpus {}...", input.display());

            let messages = corpus::dataset::load_collection(&input)?;
            let encoder = config.feature_encoder();
            let summary = corpus::builder::build_dataset(
                messages,
                &out_dir,
                &encoder,
                config.train_ratio,
                true,
            )?;

            terminal::display_dataset_summary(&summary);
            println!(
                "\n{}",
                "Upload both files to your training job's input channels.".dimmed()
            );
        }

        Commands::Classify { files, concurrency } => {
            let config = Config::load()?;
            config.require_endpoint()?;

            let encoder = config.feature_encoder();
            let endpoint = HttpEndpoint::new(&config.endpoint_url)?;
            let notifier = create_notifier(&config)?;
            let handler =
                EmailHandler::new(&encoder, &endpoint, notifier.as_ref(), config.notify_to.clone());

            info!(
                emails = files.len(),
                vocabulary_size = %config.vocabulary_size,
                "Classifying emails"
            );

            let results: Vec<(PathBuf, Result<_>)> = stream::iter(files)
                .map(|path| {
                    let handler = &handler;
                    async move {
                        let result = match std::fs::read(&path) {
                            Ok(raw) => handler.handle(&raw).await,
                            Err(e) => Err(anyhow::Error::new(e)
                                .context(format!("Failed to read {}", path.display()))),
                        };
                        (path, result)
                    }
                })
                .buffer_unordered(concurrency.max(1) as usize)
                .collect()
                .await;

            println!("\n{}", "=== Verdicts ===".bold());
            let mut failed = 0;
            for (path, result) in &results {
                let source = path.display().to_string();
                match result {
                    Ok(verdict) => terminal::display_verdict(&source, verdict),
                    Err(e) => {
                        failed += 1;
                        warn!(file = %source, error = %format!("{e:#}"), "Skipped email");
                        println!("  {:<40} {}", source, format!("Error: {e:#}").red());
                    }
                }
            }

            println!(
                "\n  Classified: {}  Failed: {}",
                results.len() - failed,
                failed
            );
            if failed > 0 && failed == results.len() {
                anyhow::bail!("No emails could be classified");
            }
        }

        Commands::Config => {
            let config = Config::load()?;
            println!("{}", "=== Configuration ===".bold());
            println!("  Vocabulary size: {}", config.vocabulary_size);
            println!(
                "  Model endpoint:  {}",
                if config.endpoint_url.is_empty() {
                    "not set".yellow().to_string()
                } else {
                    config.endpoint_url.clone()
                }
            );
            println!(
                "  Notifications:   {}",
                config.notify_url.as_deref().unwrap_or("terminal only")
            );
            println!(
                "  Recipients:      {}",
                if config.notify_to.is_empty() {
                    "none".to_string()
                } else {
                    config.notify_to.join(", ")
                }
            );
            println!("  Dataset dir:     {}", config.dataset_dir.display());
            println!(
                "  Corpus:          {}",
                if corpus::download::collection_present(&config.dataset_dir) {
                    "present".green().to_string()
                } else {
                    "missing (run `spamfilter download-dataset`)".dimmed().to_string()
                }
            );
            println!("  Train ratio:     {}", config.train_ratio);
        }
    }

    Ok(())
}

/// Create the notifier: webhook when configured, terminal otherwise.
fn create_notifier(config: &Config) -> Result<Box<dyn Notifier>> {
    match config.notify_url.as_deref() {
        Some(url) => {
            info!("Using webhook notifier");
            let notifier = WebhookNotifier::new(url).context("Failed to set up notifier")?;
            Ok(Box::new(notifier))
        }
        None => {
            info!("No SPAMFILTER_NOTIFY_URL set, printing notifications");
            Ok(Box::new(LogNotifier))
        }
    }
}
