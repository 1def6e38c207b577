//! Fixed vectors that every implementation of the derivation must
//! reproduce bit for bit.

use dxp_identity::crypto::random::FixedEntropy;
use dxp_identity::seed::{generate_mnemonic_with, mnemonic_from_entropy};
use dxp_identity::{
    bytes_to_seed, derive_identity, mnemonic_to_seed, sign, verify, verify_key_to_address,
    MnemonicStrength, Seed,
};

const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon \
                          abandon abandon abandon abandon abandon about";

struct Vector {
    seed_hex: &'static str,
    verify_key: &'static str,
    did: &'static str,
    sign_key: &'static str,
    encryption_public_key: &'static str,
    hello_signature: &'static str,
    address: &'static str,
}

const ZERO_SEED: Vector = Vector {
    seed_hex: "0000000000000000000000000000000000000000000000000000000000000000",
    verify_key: "4zvwRjXUKGfvwnParsHAS3HuSVzV5cA4McphgmoCtajS",
    did: "did:dxp:8LXvA8e8DEoLfxxdtohXHU",
    sign_key: "11111111111111111111111111111111",
    encryption_public_key: "4Dy8E9UaZscuPUf2GLxV44RCNL7oxmEXXkgWXaug1WKV",
    hello_signature: "e25c8723d039fe8f45d6c9d6a8917fa91bc754913cd596fd358a493a21a3cb59\
                      0a6537babc7df0400ab61a05589c9c36b65a143878cb0341d4e9e48419c4370d",
    address: "139E3940E64B5491722088D9A0D741628FC826E0",
};

const ABANDON_SEED: Vector = Vector {
    seed_hex: "c557eec878dfd852ba3f88087c4f350f09c55537ab5e549c3cd14320ec3cef38",
    verify_key: "AwMhMYpW3Wf2gRRR3JZwzphK9fZhfRi63nnN8BV8edEE",
    did: "did:dxp:KEUEREwwpf1BZaX8NHTfKs",
    sign_key: "EHM5ugVR8y7pCPPmS58BG9j4VYgr8HtyQhWx7LaPWVgj",
    encryption_public_key: "F68RU8gZM2QNXSSKnHsp7vkNtb477wvSVxdMabySwW2H",
    hello_signature: "489d6be2266001690438a1d8fea5b93d40fadbdbbb7e27c6c0efa33b5d34226a\
                      987aaa29f667e4b5ebde489432f3c27508b27322a2680c22708de9835fcf4d0f",
    address: "6FD145BCC8F8071A7239619B6A1A68CB8C8B2DEA",
};

fn check(seed: &Seed, v: &Vector) {
    let id = derive_identity(seed).unwrap();
    assert_eq!(id.secret.seed, v.seed_hex);
    assert_eq!(id.verify_key, v.verify_key);
    assert_eq!(id.did.as_str(), v.did);
    assert_eq!(id.secret.sign_key, v.sign_key);
    // The encryption secret is the sign key's bytes, so the encodings agree.
    assert_eq!(id.secret.encryption_private_key, v.sign_key);
    assert_eq!(id.encryption_public_key, v.encryption_public_key);

    let sig = sign(b"hello", &id).unwrap();
    assert_eq!(hex::encode(sig), v.hello_signature);
    assert!(verify(b"hello", &sig, &id.verify_key));
    assert!(!verify(b"hello!", &sig, &id.verify_key));

    assert_eq!(verify_key_to_address(&id.verify_key).unwrap().to_string(), v.address);
}

#[test]
fn golden_zero_seed() {
    check(&Seed::from_bytes([0u8; 32]), &ZERO_SEED);
}

#[test]
fn golden_zero_seed_via_bytes_and_hex() {
    check(&bytes_to_seed(&[0u8; 48]).unwrap(), &ZERO_SEED);
    check(&Seed::from_hex(ZERO_SEED.seed_hex).unwrap(), &ZERO_SEED);
}

#[test]
fn golden_abandon_mnemonic() {
    let seed = mnemonic_to_seed(ABANDON_12);
    assert_eq!(seed.to_hex(), ABANDON_SEED.seed_hex);
    check(&seed, &ABANDON_SEED);
}

#[test]
fn golden_zero_entropy_mnemonics() {
    assert_eq!(mnemonic_from_entropy(&[0u8; 16]).unwrap(), ABANDON_12);

    let mut words = vec!["abandon"; 23];
    words.push("art");
    assert_eq!(mnemonic_from_entropy(&[0u8; 32]).unwrap(), words.join(" "));

    let mut source = FixedEntropy::new(vec![0u8; 16]);
    let phrase = generate_mnemonic_with(MnemonicStrength::CONVENIENCE, &mut source).unwrap();
    assert_eq!(phrase, ABANDON_12);
    assert_eq!(source.remaining(), 0);
}
