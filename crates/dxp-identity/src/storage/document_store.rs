//! DID document registries.
//!
//! Two stores implement [`DidResolver`]:
//!
//! - [`MemoryDocumentStore`] keeps documents behind an `RwLock`. Readers run
//!   concurrently, writers are serialized, and a registered DID is visible
//!   to every subsequent lookup.
//! - [`DocumentStore`] keeps one JSON file per DID under a directory:
//!
//! ```text
//! {base_dir}/
//! └── {method_specific_id}.json   { "version": 1, "document": { ... } }
//! ```
//!
//! Documents are never edited in place. Accepting a credential builds a new
//! document with the credential appended and replaces the stored one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::decode_key;
use crate::error::{IdentityError, Result};
use crate::identity::credential::SignedCredential;
use crate::identity::did::{Did, DID_PREFIX};
use crate::identity::document::DidDocument;
use crate::storage::write_atomic;

const DOCUMENT_FILE_VERSION: u32 = 1;

/// Looks up the current document registered for a DID.
pub trait DidResolver {
    /// `Ok(None)` when nothing is registered for `did`.
    fn resolve(&self, did: &Did) -> Result<Option<DidDocument>>;
}

impl<R: DidResolver + ?Sized> DidResolver for &R {
    fn resolve(&self, did: &Did) -> Result<Option<DidDocument>> {
        (**self).resolve(did)
    }
}

/// Verify `signed` against its issuer's registered key, then return the
/// subject's document with the credential appended.
fn credential_acceptance<R: DidResolver + ?Sized>(
    resolver: &R,
    signed: &SignedCredential,
) -> Result<(Did, DidDocument)> {
    signed.verify(resolver)?;
    let subject = Did::parse(&signed.credential.claim.id)
        .map_err(|_| IdentityError::validation("claim.id", "claim id is not a valid did"))?;
    let current = resolver
        .resolve(&subject)?
        .ok_or_else(|| IdentityError::UnknownDid(subject.to_string()))?;
    let updated = current.attach_credential(signed.credential.clone())?;
    Ok((subject, updated))
}

/// Parse and validate a document before registration. The DID must be
/// the one derived from the document's own `pubKey`.
fn registration_key(document: &DidDocument) -> Result<Did> {
    document.validate()?;
    document.validate_credentials()?;
    let did = document.parsed_did()?;
    if !belongs_to_pub_key(&did, document)? {
        return Err(IdentityError::validation(
            "did",
            "did does not belong to pubKey",
        ));
    }
    Ok(did)
}

fn belongs_to_pub_key(did: &Did, document: &DidDocument) -> Result<bool> {
    let key: [u8; 32] = decode_key("pubKey", &document.pub_key)?
        .try_into()
        .map_err(|_| IdentityError::validation("pubKey", "pubKey must be 32 bytes"))?;
    Ok(did.matches_verify_key(&key))
}

// ── MemoryDocumentStore ───────────────────────────────────────────────────────

/// In-memory document registry.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<BTreeMap<Did, DidDocument>>,
}

fn poisoned<T>(_: T) -> IdentityError {
    IdentityError::StorageError("document store lock poisoned".into())
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new document. Fails with `DidAlreadyExists` if the DID
    /// is taken.
    pub fn register(&self, document: DidDocument) -> Result<()> {
        let did = registration_key(&document)?;
        let mut documents = self.documents.write().map_err(poisoned)?;
        if documents.contains_key(&did) {
            return Err(IdentityError::DidAlreadyExists(did.to_string()));
        }
        log::debug!("registered document for {did}");
        documents.insert(did, document);
        Ok(())
    }

    /// Verify a signed credential and attach it to its subject's document.
    /// Returns the replacement document.
    pub fn accept_credential(&self, signed: &SignedCredential) -> Result<DidDocument> {
        signed.verify(self)?;

        // The subject lookup and replacement happen under one write lock
        // so concurrent acceptances cannot drop each other's credentials.
        let subject = Did::parse(&signed.credential.claim.id)
            .map_err(|_| IdentityError::validation("claim.id", "claim id is not a valid did"))?;
        let mut documents = self.documents.write().map_err(poisoned)?;
        let current = documents
            .get(&subject)
            .ok_or_else(|| IdentityError::UnknownDid(subject.to_string()))?;
        let updated = current.attach_credential(signed.credential.clone())?;
        documents.insert(subject.clone(), updated.clone());
        log::debug!(
            "accepted credential from {} for {subject}",
            signed.credential.issuer
        );
        Ok(updated)
    }

    /// Registered DIDs in ascending order.
    pub fn list_dids(&self) -> Result<Vec<Did>> {
        Ok(self
            .documents
            .read()
            .map_err(poisoned)?
            .keys()
            .cloned()
            .collect())
    }

    /// Registered documents, ordered by DID.
    pub fn list_documents(&self) -> Result<Vec<DidDocument>> {
        Ok(self
            .documents
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.documents.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl DidResolver for MemoryDocumentStore {
    fn resolve(&self, did: &Did) -> Result<Option<DidDocument>> {
        Ok(self.documents.read().map_err(poisoned)?.get(did).cloned())
    }
}

// ── DocumentStore ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    version: u32,
    document: DidDocument,
}

/// Filesystem-backed document registry.
///
/// Assumes a single writer process. Writes are atomic, so readers never see
/// a partial document.
pub struct DocumentStore {
    base_dir: PathBuf,
}

impl DocumentStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Register a new document. Fails with `DidAlreadyExists` if a file for
    /// the DID is already present.
    pub fn register(&self, document: DidDocument) -> Result<()> {
        let did = registration_key(&document)?;
        if self.document_path(&did).exists() {
            return Err(IdentityError::DidAlreadyExists(did.to_string()));
        }
        self.write_document(&did, document)?;
        log::debug!("registered document for {did}");
        Ok(())
    }

    /// Verify a signed credential and attach it to its subject's document.
    /// Returns the replacement document.
    pub fn accept_credential(&self, signed: &SignedCredential) -> Result<DidDocument> {
        let (subject, updated) = credential_acceptance(self, signed)?;
        self.write_document(&subject, updated.clone())?;
        log::debug!(
            "accepted credential from {} for {subject}",
            signed.credential.issuer
        );
        Ok(updated)
    }

    /// Registered DIDs in ascending order. Files whose names are not a
    /// valid identifier are skipped.
    pub fn list_dids(&self) -> Result<Vec<Did>> {
        let mut dids = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".json") {
                match Did::parse(&format!("{DID_PREFIX}{stem}")) {
                    Ok(did) => dids.push(did),
                    Err(_) => log::warn!("skipping unrecognised document file {name_str}"),
                }
            }
        }
        dids.sort();
        Ok(dids)
    }

    /// Registered documents, ordered by DID.
    pub fn list_documents(&self) -> Result<Vec<DidDocument>> {
        let mut documents = Vec::new();
        for did in self.list_dids()? {
            if let Some(document) = self.resolve(&did)? {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    fn document_path(&self, did: &Did) -> PathBuf {
        self.base_dir
            .join(format!("{}.json", did.method_specific_id()))
    }

    fn write_document(&self, did: &Did, document: DidDocument) -> Result<()> {
        let file = DocumentFile {
            version: DOCUMENT_FILE_VERSION,
            document,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| IdentityError::SerializationError(e.to_string()))?;
        write_atomic(&self.document_path(did), json.as_bytes())
    }
}

impl DidResolver for DocumentStore {
    fn resolve(&self, did: &Did) -> Result<Option<DidDocument>> {
        let path = self.document_path(did);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        let file: DocumentFile = serde_json::from_slice(&bytes).map_err(|e| {
            IdentityError::InvalidFileFormat(format!(
                "failed to parse document file {}: {e}",
                path.display()
            ))
        })?;
        if file.version != DOCUMENT_FILE_VERSION {
            return Err(IdentityError::InvalidFileFormat(format!(
                "unsupported document file version {}",
                file.version
            )));
        }
        if file.document.did != did.as_str() {
            return Err(IdentityError::InvalidFileFormat(format!(
                "document file {} holds {}",
                path.display(),
                file.document.did
            )));
        }
        if !belongs_to_pub_key(did, &file.document)? {
            return Err(IdentityError::InvalidFileFormat(format!(
                "document file {} has a pubKey that does not derive {did}",
                path.display()
            )));
        }
        Ok(Some(file.document))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
