//! BIP-39 mnemonic generation.
//!
//! Phrases are produced from entropy drawn through an [`EntropySource`],
//! or from operator-supplied text that is hashed down to 256 bits of
//! entropy.

use bip39::Mnemonic;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::crypto::random::{EntropySource, OsEntropy};
use crate::error::{IdentityError, Result};

/// Minimum length of operator-supplied entropy text. 256 bits is 43
/// characters of base-64.
pub const MIN_USER_ENTROPY_CHARS: usize = 43;

/// Entropy strength of a generated mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MnemonicStrength {
    /// 12 words.
    Bits128,
    /// 15 words.
    Bits160,
    /// 18 words.
    Bits192,
    /// 21 words.
    Bits224,
    /// 24 words, used for real identities.
    #[default]
    Bits256,
}

impl MnemonicStrength {
    /// The short 12-word mode.
    pub const CONVENIENCE: Self = Self::Bits128;

    pub const ALL: [Self; 5] = [
        Self::Bits128,
        Self::Bits160,
        Self::Bits192,
        Self::Bits224,
        Self::Bits256,
    ];

    pub fn bits(self) -> usize {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
            Self::Bits256 => 256,
        }
    }

    pub fn entropy_len(self) -> usize {
        self.bits() / 8
    }

    /// Every word carries 11 bits; the checksum is `bits / 32`.
    pub fn word_count(self) -> usize {
        (self.bits() + self.bits() / 32) / 11
    }

    pub fn from_bits(bits: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.bits() == bits)
            .ok_or_else(|| {
                IdentityError::validation(
                    "strength",
                    format!("{bits} bits is not one of 128, 160, 192, 224, 256"),
                )
            })
    }

    pub fn from_word_count(words: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.word_count() == words)
            .ok_or_else(|| {
                IdentityError::validation(
                    "strength",
                    format!("{words} words is not one of 12, 15, 18, 21, 24"),
                )
            })
    }
}

/// Generate a mnemonic from the operating system's random source.
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    generate_mnemonic_with(strength, &mut OsEntropy)
}

/// Generate a mnemonic drawing entropy from `source`.
pub fn generate_mnemonic_with<E: EntropySource + ?Sized>(
    strength: MnemonicStrength,
    source: &mut E,
) -> Result<String> {
    let mut entropy = vec![0u8; strength.entropy_len()];
    source.fill(&mut entropy)?;
    let phrase = mnemonic_from_entropy(&entropy);
    entropy.zeroize();
    log::debug!("generated {}-word mnemonic", strength.word_count());
    phrase
}

/// Encode raw entropy (16, 20, 24, 28 or 32 bytes) as a mnemonic.
pub fn mnemonic_from_entropy(entropy: &[u8]) -> Result<String> {
    Mnemonic::from_entropy(entropy)
        .map(|m| m.to_string())
        .map_err(|e| IdentityError::InvalidMnemonic(e.to_string()))
}

/// Build a 24-word mnemonic from operator-supplied entropy text.
///
/// The text is hashed with SHA-256 to normalise its length and diffuse
/// any structure. Input shorter than [`MIN_USER_ENTROPY_CHARS`] bytes is
/// rejected.
pub fn mnemonic_from_user_entropy(input: &str) -> Result<String> {
    if input.len() < MIN_USER_ENTROPY_CHARS {
        return Err(IdentityError::InsufficientEntropy {
            required: MIN_USER_ENTROPY_CHARS,
            actual: input.len(),
        });
    }
    let mut entropy: [u8; 32] = Sha256::digest(input.as_bytes()).into();
    let phrase = mnemonic_from_entropy(&entropy);
    entropy.zeroize();
    phrase
}

/// Check that a phrase is a well-formed BIP-39 mnemonic (known words,
/// valid length, valid checksum). Returns its word count.
pub fn validate_mnemonic(phrase: &str) -> Result<usize> {
    Mnemonic::parse_normalized(phrase)
        .map(|m| m.word_count())
        .map_err(|e| IdentityError::InvalidMnemonic(e.to_string()))
}
