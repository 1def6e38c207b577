//! Error types for dxp identities.
//!
//! All errors are strongly typed and propagated without panicking.
//! Seeds, sign keys and encryption private keys are never included in
//! error messages.

/// Identity error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),

    #[error("Insufficient entropy: at least {required} characters required, got {actual}")]
    InsufficientEntropy { required: usize, actual: usize },

    #[error("Invalid seed length: at least 32 bytes required, got {actual}")]
    InvalidSeedLength { actual: usize },

    #[error("Key generation failed: {0}")]
    KeyGenFailure(String),

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Identity not found: {0}")]
    UnknownDid(String),

    #[error("DID already registered: {0}")]
    DidAlreadyExists(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IdentityError {
    /// Shorthand for a [`IdentityError::Validation`] naming `field`.
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// The offending field of a validation error, if this is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the error signals a broken environment or primitive rather
    /// than bad caller input. Fatal errors must not be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EntropySourceFailure(_) | Self::KeyGenFailure(_) | Self::DerivationFailed(_)
        )
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
