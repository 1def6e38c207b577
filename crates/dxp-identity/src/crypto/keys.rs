//! Ed25519 signing and X25519 encryption key pairs.
//!
//! Both pairs are generated deterministically from a byte stream, the
//! way NaCl-style generators consume a caller-supplied reader instead of
//! the system random source. The signing pair reads its 32-byte secret
//! from the seed; the encryption pair reads its 32-byte secret from the
//! signing pair's 64-byte private key buffer (`secret ‖ public`).

use std::io::Read;

use ed25519_dalek::{
    SigningKey, VerifyingKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{IdentityError, Result};

/// Encode key material as Base58 (Bitcoin alphabet).
pub fn encode_key(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode Base58 key material, naming `field` on failure.
pub fn decode_key(field: &str, encoded: &str) -> Result<Vec<u8>> {
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| IdentityError::InvalidKey(format!("{field}: invalid base58: {e}")))
}

/// An Ed25519 key pair for signing operations.
///
/// The public half is always computed from the secret half; a pair can
/// only be reassembled from stored halves when they agree.
pub struct SigningKeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl SigningKeyPair {
    /// Build a key pair from a 32-byte Ed25519 secret.
    pub fn from_secret_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Generate a key pair by reading the secret from `reader`.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut secret = [0u8; SECRET_KEY_LENGTH];
        reader
            .read_exact(&mut secret)
            .map_err(|e| IdentityError::KeyGenFailure(format!("signing key entropy: {e}")))?;
        let key_pair = Self::from_secret_bytes(&secret);
        secret.zeroize();
        Ok(key_pair)
    }

    /// Reassemble a key pair from its stored secret and public halves.
    ///
    /// Fails unless both halves are 32 bytes and `verify_key` is the
    /// public image of `sign_key`.
    pub fn from_halves(sign_key: &[u8], verify_key: &[u8]) -> Result<Self> {
        if sign_key.len() != SECRET_KEY_LENGTH {
            return Err(IdentityError::InvalidKey(format!(
                "sign key must be {SECRET_KEY_LENGTH} bytes, got {}",
                sign_key.len()
            )));
        }
        if verify_key.len() != PUBLIC_KEY_LENGTH {
            return Err(IdentityError::InvalidKey(format!(
                "verify key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                verify_key.len()
            )));
        }

        let mut full = [0u8; KEYPAIR_LENGTH];
        full[..SECRET_KEY_LENGTH].copy_from_slice(sign_key);
        full[SECRET_KEY_LENGTH..].copy_from_slice(verify_key);
        let result = Self::from_keypair_bytes(&full);
        full.zeroize();
        result
    }

    /// Reassemble from the 64-byte `secret ‖ public` private key form.
    pub fn from_keypair_bytes(bytes: &[u8; KEYPAIR_LENGTH]) -> Result<Self> {
        let signing_key = SigningKey::from_keypair_bytes(bytes).map_err(|_| {
            IdentityError::InvalidKey("verify key does not match sign key".into())
        })?;
        let verifying_key = signing_key.verifying_key();
        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Reconstruct a verifying key from raw bytes.
    pub fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey> {
        let key: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            IdentityError::InvalidKey(format!(
                "verify key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(&key)
            .map_err(|e| IdentityError::InvalidKey(format!("invalid verifying key: {e}")))
    }

    /// Return a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Return the verifying (public) key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Return the 32-byte secret. Caller must zeroize after use.
    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    /// Return the verifying key bytes.
    pub fn verifying_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    /// Return the 64-byte private key (`secret ‖ public`). Caller must
    /// zeroize after use.
    pub fn to_keypair_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }
}

/// An X25519 static key pair for box-style encryption and key exchange.
pub struct EncryptionKeyPair {
    secret: StaticSecret,
    public: X25519PublicKey,
}

impl EncryptionKeyPair {
    /// Reconstruct from secret key bytes. Clamping happens inside the
    /// scalar multiplication; the stored secret keeps the raw bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Generate a key pair by reading the secret from `reader`.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; 32];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| IdentityError::KeyGenFailure(format!("encryption key entropy: {e}")))?;
        let key_pair = Self::from_secret_bytes(bytes);
        bytes.zeroize();
        Ok(key_pair)
    }

    /// Derive the encryption pair by using the signing pair's private key
    /// buffer as the randomness stream.
    pub fn from_signing_key_pair(signing: &SigningKeyPair) -> Result<Self> {
        let mut private_key = signing.to_keypair_bytes();
        let result = Self::from_reader(&mut &private_key[..]);
        private_key.zeroize();
        result
    }

    /// Perform Diffie-Hellman key exchange with a peer's public key.
    pub fn diffie_hellman(&self, peer_public: &X25519PublicKey) -> [u8; 32] {
        *self.secret.diffie_hellman(peer_public).as_bytes()
    }

    /// Return the public key.
    pub fn public_key(&self) -> &X25519PublicKey {
        &self.public
    }

    /// Return the public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }

    /// Return the secret bytes. Caller must zeroize after use.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }
}
