//! Seed reduction.
//!
//! Both reductions are fixed for interoperability with identities issued
//! by other ledger tooling: a mnemonic becomes the SHA-256 digest of its
//! exact UTF-8 bytes, and raw input is truncated to its first 32 bytes.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{IdentityError, Result};

/// Length of a seed in bytes.
pub const SEED_LENGTH: usize = 32;

/// A 32-byte secret from which every key of an identity is derived.
///
/// Zeroized on drop; `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }

    /// Lowercase hex, the form stored in an identity's secret.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a seed from hex. The decoded bytes go through
    /// [`bytes_to_seed`], so longer input is truncated.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut raw = hex::decode(s.trim())
            .map_err(|e| IdentityError::validation("seed", format!("invalid hex: {e}")))?;
        let seed = bytes_to_seed(&raw);
        raw.zeroize();
        seed
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// Reduce a mnemonic phrase to a seed: `SHA-256(utf8(mnemonic))`.
///
/// The phrase is hashed as given. No normalisation is applied and the
/// BIP-39 checksum is not enforced.
pub fn mnemonic_to_seed(mnemonic: &str) -> Seed {
    let digest = Sha256::digest(mnemonic.as_bytes());
    let mut bytes = [0u8; SEED_LENGTH];
    bytes.copy_from_slice(&digest[..SEED_LENGTH]);
    Seed(bytes)
}

/// Take the first 32 bytes of `raw` as a seed.
pub fn bytes_to_seed(raw: &[u8]) -> Result<Seed> {
    if raw.len() < SEED_LENGTH {
        return Err(IdentityError::InvalidSeedLength { actual: raw.len() });
    }
    let mut bytes = [0u8; SEED_LENGTH];
    bytes.copy_from_slice(&raw[..SEED_LENGTH]);
    Ok(Seed(bytes))
}
