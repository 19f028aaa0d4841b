//! Save pipeline: write the secret manifest, then encrypt it in place.
//!
//! The two stages run strictly in order. Encryption is never attempted when
//! the write fails. When encryption fails the plaintext manifest stays on
//! disk so the user can retry without re-entering the data.

mod sops;
mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use thiserror::Error;
use tracing::{info, warn};

use crate::secret::{SecretData, SecretDocument};

pub use sops::SopsEncryptor;
pub use store::FileStore;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to write {}: {reason}", path.display())]
    Persist { path: PathBuf, reason: String },
    #[error(
        "Failed to encrypt {}. The unencrypted file is still on disk. {reason}",
        path.display()
    )]
    Encrypt { path: PathBuf, reason: String },
}

/// Where secret manifests are written.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Location of the manifest for the secret `name`.
    fn path_for(&self, name: &str) -> PathBuf;

    async fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Encrypts a manifest in place.
#[async_trait]
pub trait Encryptor: Send + Sync {
    async fn encrypt(&self, path: &Path) -> Result<()>;
}

#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn DocumentStore>,
    encryptor: Arc<dyn Encryptor>,
}

impl Pipeline {
    pub fn new(store: Arc<dyn DocumentStore>, encryptor: Arc<dyn Encryptor>) -> Self {
        Self { store, encryptor }
    }

    /// Write `data` as the secret `name` and encrypt the written file.
    ///
    /// Returns the path of the encrypted manifest.
    pub async fn persist_and_encrypt(
        &self,
        name: &str,
        data: SecretData,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.store.path_for(name);
        let persist_error = |reason: String| PipelineError::Persist {
            path: path.clone(),
            reason,
        };

        let yaml = SecretDocument::new(name, data)
            .to_yaml()
            .map_err(|e| persist_error(format!("{e:#}")))?;
        self.store
            .write(&path, &yaml)
            .await
            .map_err(|e| persist_error(format!("{e:#}")))?;
        info!(path = %path.display(), "Wrote secret manifest");

        if let Err(e) = self.encryptor.encrypt(&path).await {
            warn!(path = %path.display(), "Encryption failed, plaintext manifest left on disk");
            return Err(PipelineError::Encrypt {
                path,
                reason: format!("{e:#}"),
            });
        }
        info!(path = %path.display(), "Encrypted secret manifest");

        Ok(path)
    }
}
