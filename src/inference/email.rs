// Minimal RFC 5322 / MIME reader, just enough to pull the plain-text body
// and the headers the verdict report needs.
//
// Multipart messages are walked depth-first and the first text/plain part
// that is not an attachment wins. Single-part messages use their own body
// regardless of content type.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex_lite::Regex;
use serde::Serialize;

use crate::features::{decode_text, FeatureError};

/// The parts of an inbound email the classifier cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    /// Plain-text body, lowercased and whitespace-joined.
    pub body: String,
}

/// A header block plus its raw body.
struct Entity<'a> {
    headers: Vec<(String, String)>,
    body: &'a str,
}

impl<'a> Entity<'a> {
    fn parse(raw: &'a str) -> Self {
        let (head, body) = if let Some(rest) = raw.strip_prefix('\n') {
            // A blank first line means no headers at all
            ("", rest)
        } else {
            match raw.find("\n\n") {
                Some(pos) => (&raw[..pos], &raw[pos + 2..]),
                None => (raw, ""),
            }
        };
        Self {
            headers: parse_headers(head),
            body,
        }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Lowercased `type/subtype`, defaulting to text/plain.
    fn content_type(&self) -> String {
        self.header("Content-Type")
            .and_then(|v| v.split(';').next())
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text/plain".to_string())
    }

    fn is_attachment(&self) -> bool {
        self.header("Content-Disposition")
            .is_some_and(|d| d.to_ascii_lowercase().contains("attachment"))
    }

    fn boundary(&self) -> Option<String> {
        let content_type = self.header("Content-Type")?;
        boundary_regex()
            .captures(content_type)
            .map(|c| c[1].trim().to_string())
    }

    /// Body bytes after undoing the Content-Transfer-Encoding.
    fn decoded_body(&self) -> Result<Vec<u8>, FeatureError> {
        let encoding = self
            .header("Content-Transfer-Encoding")
            .map(|e| e.trim().to_ascii_lowercase());
        match encoding.as_deref() {
            Some("base64") => {
                let compact: String = self.body.split_whitespace().collect();
                STANDARD
                    .decode(compact)
                    .map_err(|e| FeatureError::Decoding(format!("invalid base64 body: {e}")))
            }
            Some("quoted-printable") => Ok(decode_quoted_printable(self.body)),
            _ => Ok(self.body.as_bytes().to_vec()),
        }
    }
}

fn boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)boundary\s*=\s*"?([^";]+)"?"#).expect("valid regex"))
}

/// Parse header lines, joining folded continuation lines onto the previous value.
fn parse_headers(head: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in head.lines() {
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    headers
}

/// Split a multipart body into its raw parts using `boundary`.
fn split_multipart<'a>(body: &'a str, boundary: &str) -> Vec<&'a str> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut current: Option<usize> = None;
    let mut offset: usize = 0;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed.starts_with(&delimiter) {
            if let Some(start) = current.take() {
                // Drop the newline that belongs to the delimiter line
                let end = offset.saturating_sub(1).max(start);
                parts.push(&body[start..end]);
            }
            if trimmed[delimiter.len()..].starts_with("--") {
                break;
            }
            current = Some(offset + line.len());
        }
        offset += line.len();
    }

    // Unterminated final part
    if let Some(start) = current {
        parts.push(&body[start.min(body.len())..]);
    }

    parts
}

/// Depth-first search for the first non-attachment text/plain part.
fn find_text_part(entity: &Entity<'_>) -> Result<Option<Vec<u8>>, FeatureError> {
    let content_type = entity.content_type();

    if content_type.starts_with("multipart/") {
        let Some(boundary) = entity.boundary() else {
            return Ok(None);
        };
        for raw_part in split_multipart(entity.body, &boundary) {
            let part = Entity::parse(raw_part);
            if let Some(body) = find_text_part(&part)? {
                return Ok(Some(body));
            }
        }
        return Ok(None);
    }

    if content_type == "text/plain" && !entity.is_attachment() {
        return entity.decoded_body().map(Some);
    }

    Ok(None)
}

/// Undo quoted-printable: `=XX` hex escapes and `=` soft line breaks.
/// Malformed escapes are passed through unchanged.
pub fn decode_quoted_printable(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(b'\n'), _) => i += 2,
            (Some(b'\r'), Some(b'\n')) => i += 3,
            (Some(&hi), Some(&lo)) => match (hex_value(hi), hex_value(lo)) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'=');
                    i += 1;
                }
            },
            // Trailing "=" at end of input is a soft break
            (None, _) => i += 1,
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Strip carriage returns, lowercase each word and join with single spaces.
pub fn normalize_body(body: &str) -> String {
    body.replace('\r', "")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a raw email into headers and a normalized plain-text body.
///
/// A message with no usable text part gets an empty body, which encodes to
/// the all-zero feature row. Only undecodable content is an error.
pub fn parse_email(raw: &str) -> Result<EmailMessage, FeatureError> {
    let raw = raw.replace("\r\n", "\n");
    let entity = Entity::parse(&raw);

    let body_bytes = if entity.content_type().starts_with("multipart/") {
        find_text_part(&entity)?.unwrap_or_default()
    } else {
        entity.decoded_body()?
    };
    let body = normalize_body(decode_text(&body_bytes)?);

    Ok(EmailMessage {
        from: entity.header("From").map(str::to_string),
        to: entity.header("To").map(str::to_string),
        subject: entity.header("Subject").map(str::to_string),
        date: entity.header("Date").map(str::to_string),
        body,
    })
}

/// Decode raw bytes as UTF-8, then parse.
pub fn parse_email_bytes(raw: &[u8]) -> Result<EmailMessage, FeatureError> {
    parse_email(decode_text(raw)?)
}
