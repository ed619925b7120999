// Error taxonomy for the encoding core.
//
// The core is pure computation: it never catches these, it only returns them.
// Application layers wrap them in anyhow with context.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Input bytes could not be interpreted as UTF-8 text.
    #[error("input is not valid UTF-8 text: {0}")]
    Decoding(String),

    /// Vocabulary size is unusable with `(hash mod (N-1)) + 1`.
    #[error("invalid vocabulary configuration: {0}")]
    InvalidConfiguration(String),
}
