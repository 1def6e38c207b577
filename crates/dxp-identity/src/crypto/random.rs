//! Entropy sources and secure random number generation.
//!
//! Mnemonic generation draws its entropy through the [`EntropySource`]
//! trait so callers can swap the operating system source for a
//! deterministic one in tests. Nonces and salts for the encrypted
//! identity file come straight from the operating system via `rand`.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{IdentityError, Result};

/// A provider of random bytes.
pub trait EntropySource {
    /// Fill `buf` completely or fail with
    /// [`IdentityError::EntropySourceFailure`].
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system's cryptographic random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| IdentityError::EntropySourceFailure(e.to_string()))
    }
}

/// Serves a fixed byte buffer, then fails once it runs dry.
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    bytes: Vec<u8>,
    pos: usize,
}

impl FixedEntropy {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            pos: 0,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() > self.remaining() {
            return Err(IdentityError::EntropySourceFailure(format!(
                "fixed entropy exhausted: {} bytes requested, {} left",
                buf.len(),
                self.remaining()
            )));
        }
        let end = self.pos + buf.len();
        buf.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// Adapts any `rand_core` generator, e.g. a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct RngEntropy<R>(pub R);

impl<R: RngCore> EntropySource for RngEntropy<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.0
            .try_fill_bytes(buf)
            .map_err(|e| IdentityError::EntropySourceFailure(e.to_string()))
    }
}

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    fill_random(&mut buf);
    buf
}

/// Generate a random 12-byte nonce (for ChaCha20-Poly1305).
pub fn random_nonce_12() -> [u8; 12] {
    random_bytes()
}

/// Generate a random 16-byte salt.
pub fn random_salt_16() -> [u8; 16] {
    random_bytes()
}
