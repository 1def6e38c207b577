//! Ed25519 signing and verification.
//!
//! Provides a simple API for signing arbitrary messages and verifying
//! signatures against known public keys, plus the canonical JSON byte
//! form used when a structured value is signed.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SIGNATURE_LENGTH};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{IdentityError, Result};

/// Sign a message with an Ed25519 signing key.
pub fn sign(signing_key: &SigningKey, message: &[u8]) -> Signature {
    signing_key.sign(message)
}

/// Verify an Ed25519 signature against a public key and message.
pub fn verify(verifying_key: &VerifyingKey, message: &[u8], signature: &Signature) -> Result<()> {
    verifying_key
        .verify(message, signature)
        .map_err(|_| IdentityError::SignatureInvalid)
}

/// Verify a raw signature buffer. Any length other than 64 is simply
/// not a valid signature.
pub fn verify_bytes(verifying_key: &VerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(sig_array) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_array);
    verify(verifying_key, message, &signature).is_ok()
}

/// Sign a message and return the signature as lowercase hex.
pub fn sign_to_hex(signing_key: &SigningKey, message: &[u8]) -> String {
    hex::encode(sign(signing_key, message).to_bytes())
}

/// Verify a hex-encoded signature.
pub fn verify_from_hex(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature_hex: &str,
) -> Result<()> {
    let sig_bytes = hex::decode(signature_hex)
        .map_err(|e| IdentityError::InvalidKey(format!("invalid hex signature: {e}")))?;

    let sig_array: [u8; SIGNATURE_LENGTH] = sig_bytes
        .try_into()
        .map_err(|_| IdentityError::InvalidKey("signature must be 64 bytes".into()))?;

    verify(verifying_key, message, &Signature::from_bytes(&sig_array))
}

/// Serialize a value to compact JSON with object keys sorted at every
/// depth, so that independently produced encodings are byte-identical.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let value =
        serde_json::to_value(value).map_err(|e| IdentityError::SerializationError(e.to_string()))?;
    serde_json::to_vec(&sort_keys(value))
        .map_err(|e| IdentityError::SerializationError(e.to_string()))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Sign the canonical JSON form of a value.
pub fn sign_json<T: Serialize>(signing_key: &SigningKey, value: &T) -> Result<Signature> {
    Ok(sign(signing_key, &canonical_json(value)?))
}

/// Verify a signature over the canonical JSON form of a value.
pub fn verify_json<T: Serialize>(
    verifying_key: &VerifyingKey,
    value: &T,
    signature: &Signature,
) -> Result<()> {
    verify(verifying_key, &canonical_json(value)?, signature)
}
