use std::path::{Path, PathBuf};

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::pipeline::DocumentStore;

/// Writes manifests as `<name>.yaml` inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.yaml"))
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Could not create {}", parent.display()))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Plaintext secrets until sops has run.
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        // `mode` only applies to new files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
        }
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        debug!(path = %path.display(), bytes = contents.len(), "Manifest written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for() {
        let store = FileStore::new("/tmp/secrets");
        assert_eq!(
            store.path_for("db"),
            PathBuf::from("/tmp/secrets/db.yaml")
        );
    }

    #[tokio::test]
    async fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        let path = store.path_for("db");

        store.write(&path, "kind: Secret\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kind: Secret\n");
    }

    #[tokio::test]
    async fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let path = store.path_for("db");

        store.write(&path, "a much longer first version\n").await.unwrap();
        store.write(&path, "short\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let path = store.path_for("db");

        store.write(&path, "data: {}\n").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_restricts_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let path = store.path_for("db");
        std::fs::write(&path, "old\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        store.write(&path, "data: {}\n").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data: {}\n");
    }
}
