//! Storage for identity files and DID documents.
//!
//! # Directory layout
//!
//! By convention the default root is `~/.dxp/`:
//!
//! ```text
//! ~/.dxp/
//! ├── identity/
//! │   ├── default.dxp
//! │   └── {name}.dxp
//! └── documents/
//!     └── {method_specific_id}.json
//! ```
//!
//! # Modules
//!
//! - [`identity_file`]: `.dxp` save/load with passphrase encryption.
//! - [`document_store`]: DID resolution and document registries.

pub mod document_store;
pub mod identity_file;

pub use document_store::{DidResolver, DocumentStore, MemoryDocumentStore};
pub use identity_file::{
    load_identity, read_public_document, save_identity, EncryptionMetadata, IdentityFile,
};

use std::path::Path;

use crate::error::Result;

/// Write `data` to `path` through a sibling temp file and a rename, creating
/// the parent directory if needed.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
