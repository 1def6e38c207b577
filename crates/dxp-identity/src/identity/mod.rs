//! Identities, DIDs, DID documents and credentials.
//!
//! An [`Identity`] is derived from a seed and holds its secret. The public
//! half is published as a [`DidDocument`], to which issuers attach
//! [`Credential`]s.

pub mod credential;
pub mod derive;
pub mod did;
pub mod document;
pub mod signature;

pub use credential::{
    sign_credential, Claim, Credential, SignedCredential, BASE_CREDENTIAL_TYPE,
    KYC_CREDENTIAL_TYPE,
};
pub use derive::{derive_identity, encryption_key_pair_from_sign_key, Identity, Secret};
pub use did::{is_valid_did, Did, DID_METHOD, DID_PREFIX};
pub use document::{new_document, DidDocument};
pub use signature::{sign, verify};
