//! Randomized differential test for the address hash.
//!
//! Addresses must be a pure function of the verify key, match an
//! independent SHA-256 computation, and not collide across many keys.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use dxp_identity::address::{Address, ADDRESS_LENGTH};
use dxp_identity::crypto::keys::encode_key;
use dxp_identity::{
    derive_identity, did_to_address, verify_key_to_address, MemoryDocumentStore, Seed,
};

#[test]
fn stress_address_matches_reference_hash() {
    let mut rng = StdRng::seed_from_u64(0x6478_7069_64);
    for _ in 0..2_000 {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let id = derive_identity(&Seed::from_bytes(seed)).unwrap();

        let key = bs58::decode(&id.verify_key).into_vec().unwrap();
        let digest = Sha256::digest(&key);

        let address = verify_key_to_address(&id.verify_key).unwrap();
        assert_eq!(address.as_bytes().as_slice(), &digest[..ADDRESS_LENGTH]);
        assert_eq!(address, verify_key_to_address(&id.verify_key).unwrap());
        assert_eq!(address, id.address().unwrap());
    }
}

#[test]
fn stress_10k_distinct_keys_distinct_addresses() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = HashSet::new();
    let mut keys = HashSet::new();
    for _ in 0..10_000 {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        if !keys.insert(key) {
            continue;
        }
        let address = verify_key_to_address(&encode_key(&key)).unwrap();
        assert!(seen.insert(address), "address collision for {}", address);
    }
    assert_eq!(seen.len(), keys.len());
}

#[test]
fn stress_did_and_key_paths_agree() {
    let store = MemoryDocumentStore::new();
    let mut rng = StdRng::seed_from_u64(7);
    let mut expected = Vec::new();
    for _ in 0..200 {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let id = derive_identity(&Seed::from_bytes(seed)).unwrap();
        store.register(id.to_document()).unwrap();
        expected.push((id.did.to_string(), id.address().unwrap()));
    }
    for (did, address) in expected {
        assert_eq!(did_to_address(&store, &did).unwrap(), address);
    }
}

#[test]
fn stress_hex_and_bech32_forms_are_stable() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..500 {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        let address = verify_key_to_address(&encode_key(&key)).unwrap();
        assert_eq!(Address::from_hex(&address.to_hex()).unwrap(), address);
        let b32 = address.to_bech32("dxp").unwrap();
        assert_eq!(Address::from_bech32(&b32, "dxp").unwrap(), address);
    }
}
