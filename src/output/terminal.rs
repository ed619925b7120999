// Colored terminal output for encodings, dataset builds and verdicts.
//
// The main.rs command handlers delegate all formatting here.

use colored::Colorize;

use crate::corpus::builder::DatasetSummary;
use crate::corpus::dataset::Label;
use crate::inference::handler::Verdict;
use crate::inference::notify::Notification;

/// Show how a single text was tokenized and hashed.
pub fn display_encoding(text: &str, tokens: &[String], indices: &[usize], vocabulary_size: usize) {
    println!("\n{}", "=== Feature Encoding ===".bold());
    println!("  Text:       {}", super::truncate_chars(text, 80).dimmed());
    println!("  Vocabulary: {vocabulary_size}");
    println!();

    if tokens.is_empty() {
        println!("  {}", "No tokens, this text encodes to the all-zero row.".yellow());
        return;
    }

    println!("  {:<24} {:>6}", "Token".dimmed(), "Index".dimmed());
    println!("  {}", "-".repeat(31).dimmed());
    for (token, index) in tokens.iter().zip(indices) {
        println!("  {:<24} {:>6}", super::truncate_chars(token, 24), index);
    }

    let mut distinct = indices.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    println!();
    println!(
        "  {} tokens → {} active features",
        tokens.len(),
        distinct.len().to_string().bold()
    );
}

/// Summarize a finished dataset build.
pub fn display_dataset_summary(summary: &DatasetSummary) {
    println!("\n{}", "=== Dataset ===".bold());
    println!("  Vocabulary size: {}", summary.vocabulary_size);
    println!(
        "  Train:      {:>6} rows ({} spam)  {}",
        summary.train_rows,
        summary.train_spam,
        summary.train_path.display().to_string().dimmed()
    );
    println!(
        "  Validation: {:>6} rows ({} spam)  {}",
        summary.validation_rows,
        summary.validation_spam,
        summary.validation_path.display().to_string().dimmed()
    );
}

/// Show one classified email.
pub fn display_verdict(source: &str, verdict: &Verdict) {
    let label = colorize_label(verdict.prediction.label);
    println!(
        "  {:<40} {:<6} {:>6.1}%  {}",
        super::truncate_chars(source, 40),
        label,
        verdict.prediction.probability * 100.0,
        verdict
            .email
            .subject
            .as_deref()
            .unwrap_or("(no subject)")
            .dimmed()
    );
}

/// Print a notification the way a mail client would show it.
pub fn display_notification(notification: &Notification) {
    println!("\n{}", "--- Notification ---".dimmed());
    println!("To:      {}", notification.to.join(", "));
    println!("Subject: {}", notification.subject);
    println!();
    println!("{}", notification.body);
    println!("{}", "--------------------".dimmed());
}

fn colorize_label(label: Label) -> String {
    match label {
        Label::Spam => label.as_str().red().bold().to_string(),
        Label::Ham => label.as_str().green().to_string(),
    }
}
