#![forbid(unsafe_code)]

//! Digest accumulator.

use digest::Digest;
use std::io::Write;

/// Size of a SHA-1 digest value.
pub const DIGEST_LEN: usize = 20;

/// A streaming SHA-1 accumulator.
///
/// One accumulator serves exactly one digest pass: it starts reset, takes
/// byte ranges in order and is consumed by [`Sha1Digest::finalize`], so it
/// cannot leak state into a second pass.
pub struct Sha1Digest {
    inner: sha1::Sha1,
}

impl Sha1Digest {
    pub fn new() -> Self {
        Self {
            inner: sha1::Sha1::new(),
        }
    }

    /// Feed data into the hash.
    pub fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    /// Finalize and return the hash value.
    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&Digest::finalize(self.inner));
        out
    }
}

impl Default for Sha1Digest {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Sha1Digest {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Compute a digest in one shot.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha1Digest::new();
    hasher.update(data);
    hasher.finalize()
}
