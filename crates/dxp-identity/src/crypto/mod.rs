//! Cryptographic primitives for dxp identities.
//!
//! This module provides:
//! - Ed25519 signing key pairs and X25519 encryption key pairs
//! - Ed25519 signing and verification, raw and over canonical JSON
//! - Pluggable entropy sources
//! - HKDF-SHA256 key derivation
//! - Argon2id passphrase-based key derivation
//! - ChaCha20-Poly1305 authenticated encryption

pub mod derivation;
pub mod encryption;
pub mod keys;
pub mod random;
pub mod signing;
