//! Credentials attached to DID documents.
//!
//! A credential is a claim about a subject DID, attributed to an issuer
//! DID. Issuers authorise an attachment by signing the credential's
//! canonical JSON; the signature is checked against the issuer's
//! registered document before the credential is accepted.

use ed25519_dalek::{Signature, VerifyingKey, SIGNATURE_LENGTH};
use serde::{Deserialize, Serialize};

use crate::crypto::signing;
use crate::error::{IdentityError, Result};
use crate::identity::derive::Identity;
use crate::identity::did::{is_valid_did, Did};
use crate::storage::DidResolver;

/// Base credential type carried by every credential.
pub const BASE_CREDENTIAL_TYPE: &str = "Credential";

/// Type marking a KYC attestation.
pub const KYC_CREDENTIAL_TYPE: &str = "ProofOfKYC";

/// The subject of a credential and what is claimed about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// DID of the subject.
    pub id: String,
    pub kyc_validated: bool,
}

/// `{"credType", "issuer", "issued", "claim"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub cred_type: Vec<String>,
    /// DID of the issuer.
    pub issuer: String,
    /// RFC 3339 issuance time.
    pub issued: String,
    pub claim: Claim,
}

impl Credential {
    /// A KYC credential for `subject` issued by `issuer`.
    pub fn kyc(subject: &Did, issuer: &Did, issued: impl Into<String>) -> Self {
        Self {
            cred_type: vec![
                BASE_CREDENTIAL_TYPE.to_string(),
                KYC_CREDENTIAL_TYPE.to_string(),
            ],
            issuer: issuer.to_string(),
            issued: issued.into(),
            claim: Claim {
                id: subject.to_string(),
                kyc_validated: true,
            },
        }
    }

    /// A KYC credential issued now.
    pub fn kyc_now(subject: &Did, issuer: &Did) -> Self {
        Self::kyc(subject, issuer, crate::time::now_rfc3339())
    }

    /// Check, in order: issuer non-empty, issuer a valid DID, claim id
    /// non-empty, `issued` an RFC 3339 timestamp. The first failure is
    /// reported.
    pub fn validate(&self) -> Result<()> {
        if self.issuer.trim().is_empty() {
            return Err(IdentityError::validation(
                "issuer",
                "issuer should not be empty",
            ));
        }
        if !is_valid_did(&self.issuer) {
            return Err(IdentityError::validation("issuer", "issuer id is invalid"));
        }
        if self.claim.id.trim().is_empty() {
            return Err(IdentityError::validation(
                "claim.id",
                "claim id should not be empty",
            ));
        }
        if !crate::time::is_rfc3339(&self.issued) {
            return Err(IdentityError::validation(
                "issued",
                "issued is not an RFC 3339 timestamp",
            ));
        }
        Ok(())
    }
}

/// A credential together with its issuer's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedCredential {
    pub credential: Credential,
    /// Hex Ed25519 signature over the credential's canonical JSON.
    pub signature: String,
}

/// Sign `credential` as `issuer`. The credential must name the issuer's
/// own DID.
pub fn sign_credential(issuer: &Identity, credential: Credential) -> Result<SignedCredential> {
    credential.validate()?;
    if credential.issuer != issuer.did.as_str() {
        return Err(IdentityError::validation(
            "issuer",
            "credential issuer is not the signing identity",
        ));
    }
    let key_pair = issuer.signing_key_pair()?;
    let signature = signing::sign_json(key_pair.signing_key(), &credential)?;
    Ok(SignedCredential {
        credential,
        signature: hex::encode(signature.to_bytes()),
    })
}

impl SignedCredential {
    /// Verify the signature against a known issuer key.
    pub fn verify_with_key(&self, issuer_key: &VerifyingKey) -> Result<()> {
        let bytes = hex::decode(&self.signature).map_err(|_| IdentityError::SignatureInvalid)?;
        let array: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| IdentityError::SignatureInvalid)?;
        signing::verify_json(issuer_key, &self.credential, &Signature::from_bytes(&array))
    }

    /// Resolve the issuer's document and verify the signature against
    /// its registered key.
    pub fn verify<R: DidResolver + ?Sized>(&self, resolver: &R) -> Result<()> {
        self.credential.validate()?;
        let issuer = Did::parse(&self.credential.issuer)?;
        let document = resolver
            .resolve(&issuer)?
            .ok_or_else(|| IdentityError::UnknownDid(issuer.to_string()))?;
        self.verify_with_key(&document.verifying_key()?)
    }
}
