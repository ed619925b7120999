// Labeled message corpus: one `label<TAB>message` pair per line.
//
// This is the layout of the UCI SMS Spam Collection. The message is kept
// verbatim; the label only rides alongside the encoded feature row.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::features::decode_text;

/// Class label. The numeric value is what the model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }

    /// 0 for ham, 1 for spam.
    pub fn value(&self) -> u8 {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Label::Ham),
            1 => Some(Label::Spam),
            _ => None,
        }
    }
}

impl FromStr for Label {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            other => anyhow::bail!("unknown label {other:?} (expected ham or spam)"),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One corpus row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledMessage {
    pub label: Label,
    pub text: String,
}

/// Parse corpus text. Blank lines are skipped; anything else without a tab
/// or with an unknown label is an error naming the 1-based line number.
pub fn parse_collection(contents: &str) -> Result<Vec<LabeledMessage>> {
    let mut messages = Vec::new();

    for (i, line) in contents.lines().enumerate() {
        let line_no = i + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let (label, text) = line
            .split_once('\t')
            .with_context(|| format!("line {line_no}: expected `label<TAB>message`"))?;
        let label: Label = label
            .parse()
            .with_context(|| format!("line {line_no}: bad label"))?;

        messages.push(LabeledMessage {
            label,
            text: text.to_string(),
        });
    }

    Ok(messages)
}

/// Read and parse a corpus file.
pub fn load_collection(path: &Path) -> Result<Vec<LabeledMessage>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read corpus {}", path.display()))?;
    let contents =
        decode_text(&bytes).with_context(|| format!("Corpus {} is not UTF-8", path.display()))?;
    let messages = parse_collection(contents)
        .with_context(|| format!("Failed to parse corpus {}", path.display()))?;

    let spam = messages.iter().filter(|m| m.label == Label::Spam).count();
    info!(
        path = %path.display(),
        messages = messages.len(),
        spam,
        "Loaded labeled corpus"
    );

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let input = "ham\tGo until jurong point, crazy..\nspam\tFree entry in 2 a wkly comp\n";
        let messages = parse_collection(input).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].label, Label::Ham);
        assert_eq!(messages[1].label, Label::Spam);
        assert_eq!(messages[1].text, "Free entry in 2 a wkly comp");
    }

    #[test]
    fn test_parse_keeps_later_tabs_in_message() {
        let messages = parse_collection("spam\tcall\tnow").unwrap();
        assert_eq!(messages[0].text, "call\tnow");
    }

    #[test]
    fn test_parse_skips_blank_lines_and_crlf() {
        let messages = parse_collection("ham\tok\r\n\r\n\nspam\twin\r\n").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "ok");
    }

    #[test]
    fn test_parse_unknown_label_reports_line() {
        let err = parse_collection("ham\tok\nmaybe\thmm").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "got: {err:#}");
    }

    #[test]
    fn test_parse_missing_tab() {
        assert!(parse_collection("spam free entry").is_err());
    }

    #[test]
    fn test_label_values() {
        assert_eq!(Label::Ham.value(), 0);
        assert_eq!(Label::Spam.value(), 1);
        assert_eq!(Label::from_value(1), Some(Label::Spam));
        assert_eq!(Label::from_value(7), None);
        assert_eq!("SPAM".parse::<Label>().unwrap(), Label::Spam);
    }
}
