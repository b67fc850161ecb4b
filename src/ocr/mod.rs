pub mod http;
pub mod r#trait;

pub use http::HttpOcrProvider;
pub use r#trait::{OcrProvider, OcrResponse};

use crate::config::OcrConfig;
use std::sync::Arc;

/// Build the configured OCR provider; `None` when no endpoint is set
pub fn from_config(config: &OcrConfig) -> Option<Arc<dyn OcrProvider>> {
    let endpoint = config.endpoint.as_deref()?.trim();
    if endpoint.is_empty() {
        return None;
    }
    Some(Arc::new(HttpOcrProvider::new(
        endpoint,
        config.resolved_api_key(),
        config.timeout(),
    )))
}
