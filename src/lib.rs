pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod storage;
pub mod text;
pub mod utils;

pub use config::Config;
pub use error::{AnalysisError, CollaboratorError, ExtractionError};
pub use llm::InferenceProvider;
pub use models::{AnalysisOutcome, AnalysisType, ExtractionMethod, ExtractionOutcome};
pub use ocr::OcrProvider;
pub use pipeline::{DocumentPipeline, ExtractionOptions};
pub use storage::{DocumentStore, LocalDocumentStore};
