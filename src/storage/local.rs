use crate::error::CollaboratorError;
use crate::extractor::DocumentFormat;
use crate::models::{DocumentRef, DocumentVersionRef};
use crate::storage::DocumentStore;
use crate::utils;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Filesystem-backed store. Files are registered from under `root` and
/// served back by storage path relative to it.
pub struct LocalDocumentStore {
    root: PathBuf,
    documents: RwLock<HashMap<String, DocumentRef>>,
    versions: RwLock<HashMap<String, DocumentVersionRef>>,
    next_id: AtomicUsize,
}

impl LocalDocumentStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            documents: RwLock::new(HashMap::new()),
            versions: RwLock::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register a file under the root as a new document with one version.
    /// Without `declared_type` the mime type is guessed from the extension.
    pub async fn register_file(
        &self,
        path: &Path,
        declared_type: Option<&str>,
    ) -> Result<(DocumentRef, DocumentVersionRef), CollaboratorError> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            CollaboratorError::NotFound(format!(
                "{} is not under storage root {}",
                path.display(),
                self.root.display()
            ))
        })?;

        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        let declared_type = match declared_type {
            Some(mime) => mime.to_string(),
            None => utils::get_extension(&name)
                .and_then(|ext| DocumentFormat::from_extension(&ext))
                .map(|f| f.mime_type())
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let document = DocumentRef::new(format!("doc-{}", n), name, declared_type, None);
        let version = DocumentVersionRef::new(
            format!("ver-{}", n),
            relative.to_string_lossy().into_owned(),
            metadata.len(),
        );

        self.documents
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        self.versions
            .write()
            .await
            .insert(version.id.clone(), version.clone());

        debug!("Registered {} as {}/{}", path.display(), document.id, version.id);
        Ok((document, version))
    }

    /// Attach previously extracted text to a version
    pub async fn set_cached_text(
        &self,
        version_id: &str,
        text: impl Into<String>,
    ) -> Result<(), CollaboratorError> {
        let mut versions = self.versions.write().await;
        let version = versions
            .get_mut(version_id)
            .ok_or_else(|| CollaboratorError::NotFound(format!("version {}", version_id)))?;
        version.cached_text = Some(text.into());
        Ok(())
    }

    fn resolve(&self, storage_path: &str) -> Result<PathBuf, CollaboratorError> {
        let relative = Path::new(storage_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(CollaboratorError::NotFound(format!(
                "storage path {} is outside the storage root",
                storage_path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn get_document(&self, document_id: &str) -> Result<DocumentRef, CollaboratorError> {
        self.documents
            .read()
            .await
            .get(document_id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("document {}", document_id)))
    }

    async fn get_version(&self, version_id: &str) -> Result<DocumentVersionRef, CollaboratorError> {
        self.versions
            .read()
            .await
            .get(version_id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("version {}", version_id)))
    }

    async fn download(&self, storage_path: &str) -> Result<Vec<u8>, CollaboratorError> {
        let path = self.resolve(storage_path)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CollaboratorError::NotFound(
                format!("blob {}", storage_path),
            )),
            Err(e) => Err(CollaboratorError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_register_and_download() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("lease.txt");
        fs::write(&file, b"Residential lease between landlord and tenant").unwrap();

        let store = LocalDocumentStore::new(temp_dir.path());
        let (document, version) = store.register_file(&file, None).await.unwrap();

        assert_eq!(document.name, "lease.txt");
        assert_eq!(document.declared_type, "text/plain");
        assert_eq!(version.storage_path, "lease.txt");
        assert_eq!(version.byte_size, 45);

        let fetched = store.get_document(&document.id).await.unwrap();
        assert_eq!(fetched, document);

        let bytes = store.download(&version.storage_path).await.unwrap();
        assert_eq!(bytes, b"Residential lease between landlord and tenant");
    }

    #[tokio::test]
    async fn test_explicit_declared_type_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("upload.bin");
        fs::write(&file, b"%PDF-1.4").unwrap();

        let store = LocalDocumentStore::new(temp_dir.path());
        let (document, _) = store.register_file(&file, Some("application/pdf")).await.unwrap();
        assert_eq!(document.declared_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path());

        assert!(matches!(
            store.get_document("doc-404").await,
            Err(CollaboratorError::NotFound(_))
        ));
        assert!(matches!(
            store.download("missing.pdf").await,
            Err(CollaboratorError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_download_rejects_paths_outside_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalDocumentStore::new(temp_dir.path());
        assert!(store.download("../etc/passwd").await.is_err());
        assert!(store.download("/etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_set_cached_text() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("nda.txt");
        fs::write(&file, b"placeholder").unwrap();

        let store = LocalDocumentStore::new(temp_dir.path());
        let (_, version) = store.register_file(&file, None).await.unwrap();
        store.set_cached_text(&version.id, "cached body").await.unwrap();

        let version = store.get_version(&version.id).await.unwrap();
        assert_eq!(version.cached_text.as_deref(), Some("cached body"));
    }
}
