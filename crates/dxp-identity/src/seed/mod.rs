//! Secrets that identities are derived from.
//!
//! A mnemonic phrase (BIP-39, English) is generated from entropy and
//! reduced to a 32-byte [`Seed`]; a seed can also come straight from
//! caller-supplied bytes. Seeds are transient and never persisted by
//! this crate outside the encrypted identity file.

pub mod derive;
pub mod mnemonic;

pub use derive::{bytes_to_seed, mnemonic_to_seed, Seed, SEED_LENGTH};
pub use mnemonic::{
    generate_mnemonic, generate_mnemonic_with, mnemonic_from_entropy, mnemonic_from_user_entropy,
    validate_mnemonic, MnemonicStrength, MIN_USER_ENTROPY_CHARS,
};
