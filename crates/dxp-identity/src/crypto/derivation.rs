//! Key derivation using HKDF-SHA256.
//!
//! Used to turn the Argon2id master key of an identity file into the
//! symmetric key that actually encrypts the identity secret. Context
//! strings are namespaced so that keys for different purposes never
//! collide.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{IdentityError, Result};

/// Derive a 32-byte child key from a root key and context string.
///
/// Uses HKDF-SHA256 (RFC 5869) with the root key as IKM and
/// the context as info.
pub fn derive_key(root_key_bytes: &[u8; 32], context: &str) -> Result<[u8; 32]> {
    let hk = Hkdf::<Sha256>::new(None, root_key_bytes);
    let mut output = [0u8; 32];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| IdentityError::DerivationFailed(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}

/// Context for the identity-file encryption key. Must remain stable
/// across versions or saved identities become unreadable.
pub fn identity_encryption_context() -> &'static str {
    "dxp-identity/identity-encryption"
}
