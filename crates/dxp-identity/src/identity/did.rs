//! Decentralized identifiers.
//!
//! Format: `did:dxp:` + Base58 of the first 16 bytes of the Ed25519
//! verify key. The identifier is deliberately truncated to 128 bits and
//! must stay that way for compatibility with issued identities.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};

/// DID method name.
pub const DID_METHOD: &str = "dxp";

/// Prefix shared by every DID of this method.
pub const DID_PREFIX: &str = "did:dxp:";

/// Number of verify key bytes encoded into the identifier.
pub const DID_ID_BYTES: usize = 16;

/// A syntactically valid `did:dxp:` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Compute the DID of a verify key.
    pub fn from_verify_key_bytes(key: &[u8; 32]) -> Self {
        let encoded = bs58::encode(&key[..DID_ID_BYTES]).into_string();
        Self(format!("{DID_PREFIX}{encoded}"))
    }

    /// Compute the DID of a verifying key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self::from_verify_key_bytes(key.as_bytes())
    }

    /// Parse and validate a DID string.
    pub fn parse(s: &str) -> Result<Self> {
        check_did(s)?;
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The Base58 part after `did:dxp:`.
    pub fn method_specific_id(&self) -> &str {
        &self.0[DID_PREFIX.len()..]
    }

    /// Whether this DID belongs to the given 32-byte verify key.
    pub fn matches_verify_key(&self, key: &[u8; 32]) -> bool {
        *self == Self::from_verify_key_bytes(key)
    }
}

/// Check the DID grammar without allocating a [`Did`].
pub fn is_valid_did(s: &str) -> bool {
    check_did(s).is_ok()
}

fn check_did(s: &str) -> Result<()> {
    let invalid = |reason: &str| IdentityError::validation("did", reason);

    let Some(rest) = s.strip_prefix("did:") else {
        return Err(invalid("must start with 'did:'"));
    };
    let Some((method, id)) = rest.split_once(':') else {
        return Err(invalid("must have the form did:<method>:<identifier>"));
    };
    if method != DID_METHOD {
        return Err(invalid(&format!("unsupported method '{method}'")));
    }
    if id.is_empty() {
        return Err(invalid("identifier is empty"));
    }
    let decoded = bs58::decode(id)
        .into_vec()
        .map_err(|_| invalid("identifier is not base58"))?;
    if decoded.len() != DID_ID_BYTES {
        return Err(invalid(&format!(
            "identifier must encode {DID_ID_BYTES} bytes, got {}",
            decoded.len()
        )));
    }
    Ok(())
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Did {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self> {
        check_did(&s)?;
        Ok(Self(s))
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
