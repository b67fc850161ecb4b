pub mod local;
pub mod r#trait;

pub use local::LocalDocumentStore;
pub use r#trait::DocumentStore;
