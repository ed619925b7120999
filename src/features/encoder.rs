// Hashing-trick feature encoder.
//
// Each token is hashed into [1, N-1] and the row is the multi-hot set of
// those indices. Token counts and order are discarded; the trained model
// expects presence/absence only.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::debug;

use super::error::FeatureError;
use super::hashing::{Md5Hasher, TokenHasher};
use super::tokenizer::{tokenize, TokenizerOptions};
use super::vocabulary::VocabularySize;

/// Encodes text into fixed-width multi-hot rows.
///
/// Build one from the shared configuration for both corpus building and
/// inference, so both stages agree on `N` and the hash strategy.
#[derive(Debug, Clone)]
pub struct FeatureEncoder<H = Md5Hasher> {
    vocabulary: VocabularySize,
    tokenizer: TokenizerOptions,
    hasher: H,
}

impl FeatureEncoder<Md5Hasher> {
    /// Encoder with the MD5 strategy and default tokenizer options.
    pub fn new(vocabulary: VocabularySize) -> Self {
        Self::with_hasher(vocabulary, Md5Hasher)
    }
}

impl Default for FeatureEncoder<Md5Hasher> {
    fn default() -> Self {
        Self::new(VocabularySize::default())
    }
}

impl<H: TokenHasher> FeatureEncoder<H> {
    pub fn with_hasher(vocabulary: VocabularySize, hasher: H) -> Self {
        Self {
            vocabulary,
            tokenizer: TokenizerOptions::default(),
            hasher,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerOptions) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn vocabulary(&self) -> VocabularySize {
        self.vocabulary
    }

    pub fn tokenizer(&self) -> &TokenizerOptions {
        &self.tokenizer
    }

    /// Index of a single token: `(hash mod (N-1)) + 1`.
    pub fn index_of(&self, token: &str) -> usize {
        let hash = self.hasher.hash(token.as_bytes());
        // The remainder is < N-1, which came from a usize, so the cast is lossless.
        (hash % self.vocabulary.modulus()) as usize + 1
    }

    /// Token indices for one text, in token order. Duplicates are kept.
    pub fn hashing_trick(&self, text: &str) -> Vec<usize> {
        tokenize(text, &self.tokenizer)
            .iter()
            .map(|token| self.index_of(token))
            .collect()
    }

    /// A single `N`-wide row. Used when streaming rows to disk.
    pub fn encode_row(&self, text: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.get()];
        for index in self.hashing_trick(text) {
            row[index] = 1.0;
        }
        row
    }

    /// Encode a batch into a `(texts.len(), N)` matrix. Row `i` is text `i`.
    pub fn encode<S: AsRef<str>>(&self, texts: &[S]) -> FeatureMatrix {
        let cols = self.vocabulary.get();
        let mut matrix = FeatureMatrix::zeros(texts.len(), cols);

        for (i, text) in texts.iter().enumerate() {
            let indices = self.hashing_trick(text.as_ref());
            debug!(row = i, tokens = indices.len(), "Encoded text");
            for j in indices {
                matrix.data[i * cols + j] = 1.0;
            }
        }

        matrix
    }
}

/// Encode `texts` with the default MD5 encoder and vocabulary size `n`.
///
/// Fails fast with `InvalidConfiguration` when `n <= 1`, before any text is
/// touched.
pub fn encode<S: AsRef<str>>(texts: &[S], n: usize) -> Result<FeatureMatrix, FeatureError> {
    let vocabulary = VocabularySize::new(n)?;
    Ok(FeatureEncoder::new(vocabulary).encode(texts))
}

/// Dense row-major matrix of `0.0`/`1.0` feature values.
///
/// Serializes as a JSON array of rows, the model endpoint's input contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row `i`, or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Column indices set to 1.0 in row `i`, ascending.
    pub fn active_indices(&self, i: usize) -> Vec<usize> {
        self.row(i)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &v)| v == 1.0)
                    .map(|(j, _)| j)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}

impl Serialize for FeatureMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.iter_rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
