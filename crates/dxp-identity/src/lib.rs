//! Deterministic DID identities for the dxp ledger.
//!
//! Derives a reproducible identity (Ed25519 signing keys, X25519 encryption
//! keys and a `did:dxp:` identifier) from a mnemonic or raw seed, signs and
//! verifies messages with it, models DID documents and the credentials
//! attached to them, and maps keys and DIDs to ledger account addresses.

pub mod address;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod seed;
pub mod storage;
pub mod time;

// Re-export primary types
pub use address::{did_to_address, verify_key_to_address, Address};
pub use error::{IdentityError, Result};
pub use identity::{
    derive_identity, new_document, sign, sign_credential, verify, Claim, Credential, Did,
    DidDocument, Identity, Secret, SignedCredential,
};
pub use seed::{
    bytes_to_seed, generate_mnemonic, mnemonic_from_user_entropy, mnemonic_to_seed,
    MnemonicStrength, Seed,
};
pub use storage::{DidResolver, DocumentStore, MemoryDocumentStore};
