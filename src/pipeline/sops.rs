use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use tokio::process::Command;
use tracing::debug;

use crate::pipeline::Encryptor;

/// Encrypts manifests with `sops --config <config> -e --in-place <file>`.
pub struct SopsEncryptor {
    binary: String,
    config: PathBuf,
}

impl SopsEncryptor {
    pub fn new(binary: impl Into<String>, config: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config: config.into(),
        }
    }
}

#[async_trait]
impl Encryptor for SopsEncryptor {
    async fn encrypt(&self, path: &Path) -> Result<()> {
        debug!(binary = %self.binary, config = %self.config.display(), path = %path.display(), "Running sops");

        let output = Command::new(&self.binary)
            .arg("--config")
            .arg(&self.config)
            .arg("-e")
            .arg("--in-place")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .wrap_err_with(|| format!("Could not run {}", self.binary))?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(eyre!(
            "{} exited with {}: {}",
            self.binary,
            output.status,
            combined.trim()
        ))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_on_zero_exit() {
        let encryptor = SopsEncryptor::new("true", ".sops.yaml");
        encryptor.encrypt(Path::new("db.yaml")).await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_on_non_zero_exit() {
        let encryptor = SopsEncryptor::new("false", ".sops.yaml");
        let err = encryptor.encrypt(Path::new("db.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("false exited with"));
    }

    #[tokio::test]
    async fn test_failure_when_binary_missing() {
        let encryptor = SopsEncryptor::new("definitely-not-installed-sops", ".sops.yaml");
        let err = encryptor.encrypt(Path::new("db.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("Could not run"));
    }
}
