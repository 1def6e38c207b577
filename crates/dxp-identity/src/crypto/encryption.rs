//! Passphrase sealing for identity secret blocks.
//!
//! A [`FileKey`] is stretched from a passphrase with Argon2id and narrowed
//! to a purpose with HKDF. It seals plaintext into a [`SealedBlock`]
//! (ChaCha20-Poly1305 with a fresh 12-byte nonce) and opens it again.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{derivation, random};
use crate::error::{IdentityError, Result};

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;

// 64 MiB, 3 passes, 4 lanes.
const KDF_MEMORY_KIB: u32 = 64 * 1024;
const KDF_PASSES: u32 = 3;
const KDF_LANES: u32 = 4;

/// Symmetric key for one sealed block. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FileKey([u8; 32]);

impl FileKey {
    /// Stretch `passphrase` with Argon2id over `salt`, then bind the result
    /// to `context` with HKDF.
    pub fn from_passphrase(
        passphrase: &str,
        salt: &[u8; SALT_LEN],
        context: &str,
    ) -> Result<Self> {
        let params = Params::new(KDF_MEMORY_KIB, KDF_PASSES, KDF_LANES, Some(32))
            .map_err(|e| IdentityError::DerivationFailed(format!("argon2id parameters: {e}")))?;
        let mut stretched = Zeroizing::new([0u8; 32]);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(passphrase.as_bytes(), salt, &mut *stretched)
            .map_err(|e| IdentityError::DerivationFailed(format!("argon2id: {e}")))?;
        Ok(Self(derivation::derive_key(&stretched, context)?))
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&self.0))
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    pub fn seal(&self, plaintext: &[u8]) -> Result<SealedBlock> {
        let nonce = random::random_nonce_12();
        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| IdentityError::EncryptionFailed("secret block".into()))?;
        Ok(SealedBlock { nonce, ciphertext })
    }

    /// Decrypt a sealed block. A failed tag check means the passphrase
    /// (or the block) is wrong.
    pub fn open(&self, block: &SealedBlock) -> Result<Zeroizing<Vec<u8>>> {
        self.cipher()
            .decrypt(Nonce::from_slice(&block.nonce), block.ciphertext.as_slice())
            .map(Zeroizing::new)
            .map_err(|_| IdentityError::InvalidPassphrase)
    }
}

/// Nonce and ciphertext of a sealed secret block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlock {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl SealedBlock {
    /// Rebuild a block from stored bytes.
    pub fn from_parts(nonce: &[u8], ciphertext: Vec<u8>) -> Result<Self> {
        let nonce = nonce.try_into().map_err(|_| {
            IdentityError::DecryptionFailed(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            ))
        })?;
        Ok(Self { nonce, ciphertext })
    }
}
