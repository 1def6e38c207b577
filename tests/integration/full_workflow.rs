//! End-to-end workflow: mnemonic to identity, documents, credentials,
//! addresses and encrypted storage.

use dxp_identity::crypto::signing::{canonical_json, verify_json};
use dxp_identity::storage::{load_identity, read_public_document, save_identity};
use dxp_identity::{
    did_to_address, generate_mnemonic, mnemonic_to_seed, new_document, sign, sign_credential,
    verify, Credential, DidResolver, DocumentStore, Identity, IdentityError, MemoryDocumentStore,
    MnemonicStrength,
};

#[test]
fn workflow_mnemonic_to_signed_message() {
    let phrase = generate_mnemonic(MnemonicStrength::default()).unwrap();
    assert_eq!(phrase.split(' ').count(), 24);

    let id = dxp_identity::derive_identity(&mnemonic_to_seed(&phrase)).unwrap();
    let again = Identity::from_mnemonic(&phrase).unwrap();
    assert_eq!(id, again);

    let sig = sign(b"send 5 dxp to bob", &id).unwrap();
    assert!(verify(b"send 5 dxp to bob", &sig, &id.verify_key));
    assert!(!verify(b"send 6 dxp to bob", &sig, &id.verify_key));
}

#[test]
fn workflow_structured_message_uses_canonical_bytes() {
    let id = Identity::from_mnemonic("structured signer").unwrap();
    let a: serde_json::Value = serde_json::from_str(r#"{"to":"bob","amount":5}"#).unwrap();
    let b: serde_json::Value = serde_json::from_str(r#"{"amount":5,"to":"bob"}"#).unwrap();
    assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());

    let sig = sign(&canonical_json(&a).unwrap(), &id).unwrap();
    let sig = ed25519_dalek::Signature::from_bytes(&sig);
    assert!(verify_json(&id.verifying_key().unwrap(), &b, &sig).is_ok());
}

#[test]
fn workflow_kyc_credential_in_memory_registry() {
    let registry = MemoryDocumentStore::new();
    let authority = Identity::from_mnemonic("kyc authority").unwrap();
    let alice = Identity::from_mnemonic("alice").unwrap();

    registry.register(authority.to_document()).unwrap();
    registry
        .register(new_document(&alice.did, &alice.verify_key))
        .unwrap();

    let signed = sign_credential(&authority, Credential::kyc_now(&alice.did, &authority.did)).unwrap();
    let doc = registry.accept_credential(&signed).unwrap();

    assert!(doc.is_kyc_validated());
    assert_eq!(doc.credentials[0].issuer, authority.did.as_str());
    assert_eq!(doc.credentials[0].claim.id, alice.did.as_str());

    let resolved = registry.resolve(&alice.did).unwrap().unwrap();
    assert_eq!(resolved, doc);
    assert_eq!(
        did_to_address(&registry, alice.did.as_str()).unwrap(),
        alice.address().unwrap()
    );
}

#[test]
fn workflow_unknown_did_is_recoverable() {
    let registry = MemoryDocumentStore::new();
    let stranger = Identity::from_mnemonic("stranger").unwrap();

    let err = did_to_address(&registry, stranger.did.as_str()).unwrap_err();
    assert!(matches!(err, IdentityError::UnknownDid(_)));
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("Identity not found"));

    registry.register(stranger.to_document()).unwrap();
    assert!(did_to_address(&registry, stranger.did.as_str()).is_ok());
}

#[test]
fn workflow_file_registry_and_encrypted_identity() {
    let dir = tempfile::tempdir().unwrap();
    let id_path = dir.path().join("identity").join("default.dxp");
    let store = DocumentStore::new(dir.path().join("documents")).unwrap();

    let issuer = Identity::from_mnemonic("file issuer").unwrap();
    let subject = Identity::from_mnemonic("file subject").unwrap();
    save_identity(&issuer, &id_path, "hunter2").unwrap();

    let public = read_public_document(&id_path).unwrap();
    store.register(public).unwrap();
    store.register(subject.to_document()).unwrap();

    let loaded = load_identity(&id_path, "hunter2").unwrap();
    let signed = sign_credential(&loaded, Credential::kyc_now(&subject.did, &loaded.did)).unwrap();
    store.accept_credential(&signed).unwrap();

    let reopened = DocumentStore::new(dir.path().join("documents")).unwrap();
    let doc = reopened.resolve(&subject.did).unwrap().unwrap();
    assert_eq!(doc.credentials.len(), 1);
    assert_eq!(reopened.list_dids().unwrap().len(), 2);
    assert!(signed.verify(&reopened).is_ok());
}

#[test]
fn workflow_document_json_shape() {
    let id = Identity::from_mnemonic("json shape").unwrap();
    let json = serde_json::to_value(id.to_document()).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["credentials", "did", "pubKey"]);
    assert_eq!(json["credentials"], serde_json::json!([]));
}
