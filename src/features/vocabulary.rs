// Validated vocabulary size for the hashing space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FeatureError;

/// Vocabulary size the deployed spam model was trained with.
pub const DEFAULT_VOCABULARY_SIZE: usize = 9013;

/// Dimensionality `N` of the hash index space.
///
/// Indices live in `[1, N-1]` and index 0 is reserved, so `N` must be at
/// least 2. Construction is the only place this is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct VocabularySize(usize);

impl VocabularySize {
    pub fn new(n: usize) -> Result<Self, FeatureError> {
        if n <= 1 {
            return Err(FeatureError::InvalidConfiguration(format!(
                "vocabulary size must be at least 2 (index 0 is reserved), got {n}"
            )));
        }
        Ok(Self(n))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of assignable indices, `N - 1`. Always at least 1.
    pub fn modulus(self) -> u128 {
        (self.0 - 1) as u128
    }
}

impl Default for VocabularySize {
    fn default() -> Self {
        Self(DEFAULT_VOCABULARY_SIZE)
    }
}

impl TryFrom<usize> for VocabularySize {
    type Error = FeatureError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<VocabularySize> for usize {
    fn from(size: VocabularySize) -> usize {
        size.0
    }
}

impl FromStr for VocabularySize {
    type Err = FeatureError;

    /// Parses a decimal integer. Negative or non-numeric input is a
    /// configuration error, never clamped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s.trim().parse().map_err(|_| {
            FeatureError::InvalidConfiguration(format!("vocabulary size is not an integer: {s:?}"))
        })?;
        let n = usize::try_from(n).map_err(|_| {
            FeatureError::InvalidConfiguration(format!("vocabulary size must be positive, got {n}"))
        })?;
        Self::new(n)
    }
}

impl fmt::Display for VocabularySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
