//! Identity derivation.
//!
//! An [`Identity`] is expanded from a [`Seed`] in a fixed order:
//!
//! 1. Ed25519 key pair, reading its secret from the seed.
//! 2. X25519 key pair, reading its secret from the Ed25519 private key
//!    buffer (`secret ‖ public`). This reuses signing-key entropy for a
//!    second primitive; it is kept bit-for-bit so that identities issued
//!    by other ledger tooling derive identically.
//! 3. `did = "did:dxp:" + base58(verifyKey[0..16])`.
//! 4. The secret block: hex seed, Base58 sign key and Base58 encryption
//!    private key.
//!
//! Derivation is pure: the same seed always yields the same identity.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::address::Address;
use crate::crypto::keys::{decode_key, encode_key, EncryptionKeyPair, SigningKeyPair};
use crate::error::{IdentityError, Result};
use crate::identity::did::Did;
use crate::identity::document::DidDocument;
use crate::seed::{mnemonic_to_seed, Seed};

/// Secret key material of an identity.
///
/// Must never leave the trust boundary in the clear. `Debug` is redacted
/// and the strings are zeroized on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Hex-encoded 32-byte seed.
    pub seed: String,
    /// Base58 Ed25519 secret (first half of the private key).
    pub sign_key: String,
    /// Base58 X25519 secret.
    pub encryption_private_key: String,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// A complete identity: DID, public keys and the secret they derive from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub did: Did,
    /// Base58 Ed25519 public key.
    pub verify_key: String,
    /// Base58 X25519 public key.
    pub encryption_public_key: String,
    pub secret: Secret,
}

/// Derive the identity of a seed.
pub fn derive_identity(seed: &Seed) -> Result<Identity> {
    let signing = SigningKeyPair::from_reader(&mut &seed.as_bytes()[..])?;
    let encryption = EncryptionKeyPair::from_signing_key_pair(&signing)?;

    let verify_key = signing.verifying_key_bytes();
    let did = Did::from_verify_key_bytes(&verify_key);

    let mut sign_secret = signing.secret_bytes();
    let mut enc_secret = encryption.secret_bytes();
    let secret = Secret {
        seed: seed.to_hex(),
        sign_key: encode_key(&sign_secret),
        encryption_private_key: encode_key(&enc_secret),
    };
    sign_secret.zeroize();
    enc_secret.zeroize();

    log::debug!("derived identity {did}");

    Ok(Identity {
        did,
        verify_key: encode_key(&verify_key),
        encryption_public_key: encode_key(&encryption.public_key_bytes()),
        secret,
    })
}

/// Recover the encryption key pair from a stored Base58 sign key alone.
pub fn encryption_key_pair_from_sign_key(sign_key: &str) -> Result<EncryptionKeyPair> {
    let mut bytes = decode_key("signKey", sign_key)?;
    let result = EncryptionKeyPair::from_reader(&mut &bytes[..]);
    bytes.zeroize();
    result
}

impl Identity {
    /// Derive an identity from a mnemonic phrase.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self> {
        derive_identity(&mnemonic_to_seed(mnemonic))
    }

    /// Reassemble the signing key pair from `signKey` and `verifyKey`.
    pub fn signing_key_pair(&self) -> Result<SigningKeyPair> {
        let mut sign_key = decode_key("signKey", &self.secret.sign_key)?;
        let verify_key = decode_key("verifyKey", &self.verify_key)?;
        let result = SigningKeyPair::from_halves(&sign_key, &verify_key);
        sign_key.zeroize();
        result
    }

    /// Reassemble the encryption key pair, checking it against the stored
    /// public key.
    pub fn encryption_key_pair(&self) -> Result<EncryptionKeyPair> {
        let key_pair = self.signing_key_pair()?;
        let encryption = EncryptionKeyPair::from_signing_key_pair(&key_pair)?;
        if encode_key(&encryption.public_key_bytes()) != self.encryption_public_key {
            return Err(IdentityError::InvalidKey(
                "encryption public key does not match sign key".into(),
            ));
        }
        Ok(encryption)
    }

    /// Decode the verify key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        let bytes = decode_key("verifyKey", &self.verify_key)?;
        SigningKeyPair::verifying_key_from_bytes(&bytes)
    }

    /// Check that every stored field is consistent with the sign key: the
    /// verify key, the encryption keys and the DID.
    pub fn validate(&self) -> Result<()> {
        let key_pair = self.signing_key_pair()?;
        if !self.did.matches_verify_key(&key_pair.verifying_key_bytes()) {
            return Err(IdentityError::validation(
                "did",
                "did does not belong to verify key",
            ));
        }
        let encryption = self.encryption_key_pair()?;
        let mut enc_secret = encryption.secret_bytes();
        let matches = encode_key(&enc_secret) == self.secret.encryption_private_key;
        enc_secret.zeroize();
        if !matches {
            return Err(IdentityError::InvalidKey(
                "encryption private key does not match sign key".into(),
            ));
        }
        Ok(())
    }

    /// The ledger document for this identity: DID and verify key, no
    /// credentials.
    pub fn to_document(&self) -> DidDocument {
        DidDocument::new(self.did.as_str(), &self.verify_key)
    }

    /// The account address of this identity.
    pub fn address(&self) -> Result<Address> {
        crate::address::verify_key_to_address(&self.verify_key)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))
    }

    /// Parse an identity from JSON and validate its key material.
    pub fn from_json(json: &str) -> Result<Self> {
        let identity: Self = serde_json::from_str(json)
            .map_err(|e| IdentityError::SerializationError(format!("identity: {e}")))?;
        identity.validate()?;
        Ok(identity)
    }
}
