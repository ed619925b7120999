// Text-to-feature encoding shared by corpus building and email classification.
//
// Training rows and inference payloads both go through FeatureEncoder. The
// vocabulary size and hash strategy must match on both sides or the deployed
// model silently receives out-of-distribution vectors.

pub mod encoder;
pub mod error;
pub mod hashing;
pub mod tokenizer;
pub mod vocabulary;

pub use encoder::{FeatureEncoder, FeatureMatrix};
pub use error::FeatureError;
pub use hashing::{Md5Hasher, TokenHasher};
pub use tokenizer::{text_to_word_sequence, tokenize, TokenizerOptions};
pub use vocabulary::{VocabularySize, DEFAULT_VOCABULARY_SIZE};

/// Decode raw bytes into text before tokenization.
///
/// The core does not attempt partial decoding: any invalid UTF-8 sequence
/// is reported as a `FeatureError::Decoding`.
pub fn decode_text(bytes: &[u8]) -> Result<&str, FeatureError> {
    std::str::from_utf8(bytes).map_err(|e| FeatureError::Decoding(e.to_string()))
}
