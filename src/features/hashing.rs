// Token hash strategies for the hashing trick.
//
// The index of a token must be identical across processes and machines, so
// the default strategy is a digest of the token's UTF-8 bytes rather than
// std's randomly seeded hasher.

use md5::{Digest, Md5};

/// Maps a token's bytes to an unsigned integer.
///
/// Implementations must be pure: the same bytes always produce the same
/// value, in every process.
pub trait TokenHasher: Send + Sync {
    fn hash(&self, bytes: &[u8]) -> u128;
}

/// MD5 digest read as a big-endian 128-bit integer.
///
/// This matches the index layout of the deployed model, which was trained on
/// `int(md5(word).hexdigest(), 16)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl TokenHasher for Md5Hasher {
    fn hash(&self, bytes: &[u8]) -> u128 {
        let digest = Md5::digest(bytes);
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&digest);
        u128::from_be_bytes(buf)
    }
}

impl<H: TokenHasher + ?Sized> TokenHasher for &H {
    fn hash(&self, bytes: &[u8]) -> u128 {
        (**self).hash(bytes)
    }
}

impl<H: TokenHasher + ?Sized> TokenHasher for Box<H> {
    fn hash(&self, bytes: &[u8]) -> u128 {
        (**self).hash(bytes)
    }
}
