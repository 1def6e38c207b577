//! Encrypted identity storage in `.dxp` files.
//!
//! A `.dxp` file stores an identity's secret block encrypted with
//! ChaCha20-Poly1305 under a key derived from a user passphrase via
//! Argon2id, alongside the public DID document in plaintext for inspection
//! without decryption.
//!
//! File format (JSON):
//! ```json
//! {
//!     "version": 1,
//!     "format": "dxp-v1",
//!     "encryption": {
//!         "algorithm": "chacha20-poly1305",
//!         "kdf": "argon2id",
//!         "salt": "<base64-16-bytes>",
//!         "nonce": "<base64-12-bytes>"
//!     },
//!     "encrypted_secret": "<base64-ciphertext>",
//!     "public_document": { "did": "...", "pubKey": "...", "credentials": [] }
//! }
//! ```

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::encryption::{FileKey, SealedBlock};
use crate::crypto::{derivation, random};
use crate::error::{IdentityError, Result};
use crate::identity::derive::{derive_identity, Identity, Secret};
use crate::identity::document::DidDocument;
use crate::seed::Seed;
use crate::storage::write_atomic;

const DXP_VERSION: u32 = 1;
const DXP_FORMAT: &str = "dxp-v1";
const DXP_ALGORITHM: &str = "chacha20-poly1305";
const DXP_KDF: &str = "argon2id";

/// Top-level structure written to disk as a `.dxp` file.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityFile {
    pub version: u32,
    pub format: String,
    pub encryption: EncryptionMetadata,
    /// Base64 ciphertext of the identity's secret block.
    pub encrypted_secret: String,
    /// Public document (no secret material).
    pub public_document: DidDocument,
}

/// Encryption parameters stored alongside the ciphertext.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    pub algorithm: String,
    pub kdf: String,
    /// Base64 Argon2id salt (16 bytes).
    pub salt: String,
    /// Base64 ChaCha20-Poly1305 nonce (12 bytes).
    pub nonce: String,
}

/// Save an identity to a `.dxp` file, encrypting its secret block with
/// `passphrase`. The write is atomic.
pub fn save_identity(identity: &Identity, path: &Path, passphrase: &str) -> Result<()> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(&identity.secret)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))?,
    );

    let salt = random::random_salt_16();
    let key = FileKey::from_passphrase(
        passphrase,
        &salt,
        derivation::identity_encryption_context(),
    )?;
    let sealed = key.seal(&plaintext)?;

    let file = IdentityFile {
        version: DXP_VERSION,
        format: DXP_FORMAT.to_string(),
        encryption: EncryptionMetadata {
            algorithm: DXP_ALGORITHM.to_string(),
            kdf: DXP_KDF.to_string(),
            salt: STANDARD.encode(salt),
            nonce: STANDARD.encode(sealed.nonce),
        },
        encrypted_secret: STANDARD.encode(&sealed.ciphertext),
        public_document: identity.to_document(),
    };

    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| IdentityError::SerializationError(e.to_string()))?;
    write_atomic(path, json.as_bytes())?;
    log::debug!("saved identity {} to {}", identity.did, path.display());
    Ok(())
}

/// Load an identity from a `.dxp` file.
///
/// The identity is re-derived from the decrypted seed and must match both
/// the stored secret block and the plaintext public document.
pub fn load_identity(path: &Path, passphrase: &str) -> Result<Identity> {
    let file = read_file(path)?;

    let salt: [u8; 16] = decode_field("salt", &file.encryption.salt)?
        .try_into()
        .map_err(|_| IdentityError::InvalidFileFormat("salt must be 16 bytes".into()))?;
    let sealed = SealedBlock::from_parts(
        &decode_field("nonce", &file.encryption.nonce)?,
        decode_field("ciphertext", &file.encrypted_secret)?,
    )?;

    let key = FileKey::from_passphrase(
        passphrase,
        &salt,
        derivation::identity_encryption_context(),
    )?;
    let plaintext = key.open(&sealed)?;
    let secret: Secret = serde_json::from_slice(&plaintext)
        .map_err(|e| IdentityError::SerializationError(format!("secret block: {e}")))?;

    let identity = derive_identity(&Seed::from_hex(&secret.seed)?)?;
    if identity.secret != secret {
        return Err(IdentityError::InvalidKey(
            "stored secret does not match its seed".into(),
        ));
    }
    if identity.did.as_str() != file.public_document.did
        || identity.verify_key != file.public_document.pub_key
    {
        return Err(IdentityError::InvalidFileFormat(
            "public document does not match the encrypted identity".into(),
        ));
    }
    Ok(identity)
}

/// Read the public document of a `.dxp` file. No passphrase needed.
pub fn read_public_document(path: &Path) -> Result<DidDocument> {
    Ok(read_file(path)?.public_document)
}

fn read_file(path: &Path) -> Result<IdentityFile> {
    let bytes = std::fs::read(path)?;
    let file: IdentityFile = serde_json::from_slice(&bytes)
        .map_err(|e| IdentityError::InvalidFileFormat(format!("failed to parse .dxp file: {e}")))?;
    if file.version != DXP_VERSION || file.format != DXP_FORMAT {
        return Err(IdentityError::InvalidFileFormat(format!(
            "unsupported .dxp file version={} format={}",
            file.version, file.format,
        )));
    }
    Ok(file)
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| IdentityError::InvalidFileFormat(format!("invalid {name} base64: {e}")))
}
