//! Message signing with a derived identity.
//!
//! Messages are opaque bytes. Callers that sign structured data are
//! expected to canonicalize it first (see
//! [`crate::crypto::signing::canonical_json`]).

use ed25519_dalek::SIGNATURE_LENGTH;

use crate::crypto::keys::{decode_key, SigningKeyPair};
use crate::crypto::signing;
use crate::error::Result;
use crate::identity::derive::Identity;

/// Sign `message` with the identity's private key, reassembled from its
/// stored `signKey` and `verifyKey`. Ed25519 signatures are deterministic.
pub fn sign(message: &[u8], identity: &Identity) -> Result<[u8; SIGNATURE_LENGTH]> {
    let key_pair = identity.signing_key_pair()?;
    Ok(signing::sign(key_pair.signing_key(), message).to_bytes())
}

/// Whether `signature` is valid for `message` under the Base58 `verify_key`.
///
/// Never errors: a malformed key or a signature of the wrong length is
/// simply invalid.
pub fn verify(message: &[u8], signature: &[u8], verify_key: &str) -> bool {
    let Ok(bytes) = decode_key("verifyKey", verify_key) else {
        return false;
    };
    let Ok(key) = SigningKeyPair::verifying_key_from_bytes(&bytes) else {
        return false;
    };
    signing::verify_bytes(&key, message, signature)
}
