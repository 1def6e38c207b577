//! DID documents as recorded on the ledger.
//!
//! A document binds a DID to its verify key and carries the credentials
//! attached to it. The credential list is always present (never `null`)
//! so the serialized form stays stable.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize};

use crate::address::Address;
use crate::crypto::keys::{decode_key, SigningKeyPair};
use crate::error::{IdentityError, Result};
use crate::identity::credential::{Credential, KYC_CREDENTIAL_TYPE};
use crate::identity::did::{is_valid_did, Did};

/// A DID document: `{"did", "pubKey", "credentials"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    pub did: String,
    /// Base58 Ed25519 verify key.
    pub pub_key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub credentials: Vec<Credential>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Credential>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Credential>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A document for `did` with an empty credential set.
pub fn new_document(did: &Did, verify_key: &str) -> DidDocument {
    DidDocument::new(did.as_str(), verify_key)
}

impl DidDocument {
    /// A document with an empty credential set.
    pub fn new(did: impl Into<String>, verify_key: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            pub_key: verify_key.into(),
            credentials: Vec::new(),
        }
    }

    /// Return a copy of this document with `credential` appended. The
    /// receiver is left untouched.
    ///
    /// The credential is checked in a fixed order: issuer non-empty,
    /// issuer a valid DID, claim id non-empty.
    pub fn attach_credential(&self, credential: Credential) -> Result<Self> {
        credential.validate()?;
        let mut credentials = self.credentials.clone();
        credentials.push(credential);
        Ok(Self {
            did: self.did.clone(),
            pub_key: self.pub_key.clone(),
            credentials,
        })
    }

    /// Check the document's own fields: DID non-empty, verify key
    /// non-empty, DID well formed, verify key a Base58 32-byte key.
    /// Credentials are not inspected.
    pub fn validate(&self) -> Result<()> {
        if self.did.trim().is_empty() {
            return Err(IdentityError::validation("did", "did should not be empty"));
        }
        if self.pub_key.trim().is_empty() {
            return Err(IdentityError::validation(
                "pubKey",
                "pubKey should not be empty",
            ));
        }
        if !is_valid_did(&self.did) {
            return Err(IdentityError::validation("did", "did is invalid"));
        }
        let key = decode_key("pubKey", &self.pub_key)
            .map_err(|_| IdentityError::validation("pubKey", "pubKey is not base58"))?;
        if key.len() != 32 {
            return Err(IdentityError::validation(
                "pubKey",
                format!("pubKey must be 32 bytes, got {}", key.len()),
            ));
        }
        Ok(())
    }

    /// Validate every attached credential, reporting the first failure.
    pub fn validate_credentials(&self) -> Result<()> {
        self.credentials.iter().try_for_each(Credential::validate)
    }

    /// The document's DID, parsed.
    pub fn parsed_did(&self) -> Result<Did> {
        Did::parse(&self.did)
    }

    /// Decode the verify key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        let bytes = decode_key("pubKey", &self.pub_key)?;
        SigningKeyPair::verifying_key_from_bytes(&bytes)
    }

    /// The account address of the document's verify key.
    pub fn address(&self) -> Result<Address> {
        crate::address::verify_key_to_address(&self.pub_key)
    }

    /// Whether any attached credential asserts a validated KYC claim.
    pub fn is_kyc_validated(&self) -> bool {
        self.credentials.iter().any(|c| {
            c.claim.kyc_validated && c.cred_type.iter().any(|t| t == KYC_CREDENTIAL_TYPE)
        })
    }
}
