//! Filesystem-backed object store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use glob::{glob, Pattern};
use tracing::debug;

use crate::error::CloudError;
use crate::{ObjectStore, Result};

/// Object store rooted at a local directory.
///
/// Keys map to paths below the root, so `jpeg/page_1.jpeg` is
/// `<root>/jpeg/page_1.jpeg`.
pub struct LocalStore {
    root: PathBuf,
    name: String,
}

impl LocalStore {
    /// Create a store over an existing or future directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let name = root.display().to_string();
        Self { root, name }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let root = self.root.clone();
        let prefix = prefix.to_string();

        let keys = tokio::task::spawn_blocking(move || list_keys(&root, &prefix))
            .await
            .map_err(|e| CloudError::request("list", e))??;

        debug!("Listed {} objects under {}", keys.len(), self.name);
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CloudError::NotFound(key.to_string()))
            }
            Err(e) => Err(CloudError::Io(e)),
        }
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<()> {
        let target = self.path_for(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(path, &target).await?;
        debug!("Stored {} at {}", path.display(), target.display());
        Ok(())
    }
}

/// Every file below `root` as a `/`-joined key, filtered by `prefix` and sorted.
fn list_keys(root: &Path, prefix: &str) -> Result<Vec<String>> {
    let pattern = format!("{}/**/*", Pattern::escape(&root.to_string_lossy()));
    let entries = glob(&pattern).map_err(|e| CloudError::request("list", e))?;

    let mut keys = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CloudError::Io(e.into_error()))?;
        if !path.is_file() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if key.starts_with(prefix) {
            keys.push(key);
        }
    }

    keys.sort();
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("jpeg/december")).unwrap();
        fs::write(dir.path().join("jpeg/december/b.jpeg"), b"b").unwrap();
        fs::write(dir.path().join("jpeg/december/a.jpeg"), b"a").unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();

        let store = LocalStore::new(dir.path());
        let keys = store.list("jpeg/").await.unwrap();

        assert_eq!(keys, vec!["jpeg/december/a.jpeg", "jpeg/december/b.jpeg"]);
    }

    #[tokio::test]
    async fn test_list_root_with_pattern_characters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("scans [1994]");
        fs::create_dir_all(root.join("jpeg/nov")).unwrap();
        fs::write(root.join("jpeg/nov/page_01.jpeg"), b"p").unwrap();
        fs::create_dir_all(root.join("jpeg/empty")).unwrap();

        let store = LocalStore::new(&root);
        let keys = store.list("").await.unwrap();

        assert_eq!(keys, vec!["jpeg/nov/page_01.jpeg"]);
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("absent"));
        assert!(store.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let err = store.get("jpeg/missing.jpeg").await.unwrap_err();
        assert!(matches!(err, CloudError::NotFound(key) if key == "jpeg/missing.jpeg"));
    }

    #[tokio::test]
    async fn test_put_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("record.json");
        fs::write(&source, b"{}").unwrap();

        let store = LocalStore::new(dir.path().join("bucket"));
        store
            .put_file("layout/december/page_layout.json", &source)
            .await
            .unwrap();

        let stored = store.get("layout/december/page_layout.json").await.unwrap();
        assert_eq!(stored, b"{}");
    }
}
