//! Basic Identity: generate a mnemonic, derive an identity, sign a message,
//! and attach a KYC credential through an in-memory registry.
//!
//! Run with:
//!   cargo run --example basic_identity -p dxp-identity

use dxp_identity::seed::{generate_mnemonic, MnemonicStrength};
use dxp_identity::{
    did_to_address, sign, sign_credential, verify, Credential, Identity, MemoryDocumentStore,
};

fn main() {
    // ── 1. Generate a mnemonic ──────────────────────────────────────────────
    //
    // 24 words for a real identity. The phrase is the only secret that
    // needs backing up: everything else is derived from it.
    let phrase =
        generate_mnemonic(MnemonicStrength::default()).expect("system entropy should be available");
    println!("Mnemonic: {phrase}");
    println!();

    // ── 2. Derive the identity ──────────────────────────────────────────────
    let alice = Identity::from_mnemonic(&phrase).expect("derivation should succeed");
    println!("Identity derived");
    println!("  DID:            {}", alice.did);
    println!("  Verify key:     {}", alice.verify_key);
    println!("  Encryption key: {}", alice.encryption_public_key);
    println!(
        "  Address:        {}",
        alice.address().expect("verify key is well formed")
    );

    // Same phrase, same identity.
    let again = Identity::from_mnemonic(&phrase).expect("derivation should succeed");
    assert_eq!(alice, again);
    println!("  Deterministic:  confirmed (same phrase => same identity)");
    println!();

    // ── 3. Sign and verify ──────────────────────────────────────────────────
    let message = b"send 10 dxp to bob";
    let signature = sign(message, &alice).expect("signing should succeed");
    println!("Signature: {}", hex::encode(signature));
    assert!(verify(message, &signature, &alice.verify_key));
    assert!(!verify(b"send 99 dxp to bob", &signature, &alice.verify_key));
    println!("  Verified: OK (tampered message rejected)");
    println!();

    // ── 4. Register documents and attach a credential ───────────────────────
    //
    // A KYC authority signs a credential about alice. The registry checks
    // the signature against the authority's registered key before attaching.
    let authority = Identity::from_mnemonic("example kyc authority").expect("derivation");
    let registry = MemoryDocumentStore::new();
    registry
        .register(authority.to_document())
        .expect("register authority");
    registry.register(alice.to_document()).expect("register alice");

    let credential = Credential::kyc_now(&alice.did, &authority.did);
    let signed = sign_credential(&authority, credential).expect("authority signs");
    let doc = registry
        .accept_credential(&signed)
        .expect("credential should be accepted");
    println!("Credential attached");
    println!("  Issuer:        {}", doc.credentials[0].issuer);
    println!("  Issued:        {}", doc.credentials[0].issued);
    println!("  KYC validated: {}", doc.is_kyc_validated());
    println!(
        "  Address (via DID): {}",
        did_to_address(&registry, alice.did.as_str()).expect("alice is registered")
    );
    println!();

    println!("All operations completed successfully.");
}
