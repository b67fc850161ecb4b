use crate::error::CollaboratorError;
use crate::models::{DocumentRef, DocumentVersionRef};

/// Read-only access to the application's documents and their stored payloads
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up a document by id
    async fn get_document(&self, document_id: &str) -> Result<DocumentRef, CollaboratorError>;

    /// Look up one version of a document
    async fn get_version(&self, version_id: &str) -> Result<DocumentVersionRef, CollaboratorError>;

    /// Fetch the binary payload stored at `storage_path`
    async fn download(&self, storage_path: &str) -> Result<Vec<u8>, CollaboratorError>;
}
