//! Account addresses.
//!
//! An address is `SHA-256(verify_key)[0..20]`. It is a one-way image of
//! the key, not a reversible encoding. DIDs resolve to addresses through
//! the document registered for them.

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use sha2::{Digest, Sha256};

use crate::crypto::keys::decode_key;
use crate::error::{IdentityError, Result};
use crate::identity::did::Did;
use crate::storage::DidResolver;

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// A 20-byte account address. Displays as upper-case hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Hash raw verify key bytes into an address.
    pub fn from_verify_key_bytes(key: &[u8]) -> Self {
        let digest = Sha256::digest(key);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Parse hex in either case.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| IdentityError::validation("address", format!("invalid hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Render as bech32 under the given human-readable prefix.
    pub fn to_bech32(&self, hrp: &str) -> Result<String> {
        let hrp = Hrp::parse(hrp)
            .map_err(|e| IdentityError::validation("hrp", format!("invalid prefix: {e}")))?;
        bech32::encode::<Bech32>(hrp, &self.0)
            .map_err(|e| IdentityError::SerializationError(format!("bech32 encode: {e}")))
    }

    /// Parse a bech32 address, requiring the given prefix.
    pub fn from_bech32(s: &str, hrp: &str) -> Result<Self> {
        let (found, data) = bech32::decode(s)
            .map_err(|e| IdentityError::validation("address", format!("invalid bech32: {e}")))?;
        if found.as_str() != hrp {
            return Err(IdentityError::validation(
                "address",
                format!("expected prefix '{hrp}', got '{found}'"),
            ));
        }
        Self::from_slice(&data)
    }

    fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            IdentityError::validation(
                "address",
                format!("address must be {ADDRESS_LENGTH} bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Address of a Base58 verify key.
pub fn verify_key_to_address(verify_key: &str) -> Result<Address> {
    let bytes = decode_key("verifyKey", verify_key)?;
    if bytes.len() != 32 {
        return Err(IdentityError::InvalidKey(format!(
            "verify key must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_verify_key_bytes(&bytes))
}

/// Address of a DID, through the verify key of its registered document.
pub fn did_to_address<R: DidResolver + ?Sized>(resolver: &R, did: &str) -> Result<Address> {
    let did = Did::parse(did)?;
    let document = resolver
        .resolve(&did)?
        .ok_or_else(|| IdentityError::UnknownDid(did.to_string()))?;
    verify_key_to_address(&document.pub_key)
}
