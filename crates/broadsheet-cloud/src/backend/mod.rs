//! Service backend implementations.

#[cfg(feature = "aws")]
pub mod aws;

pub mod local;

use std::path::Path;

use async_trait::async_trait;

use crate::{AnalysisBlock, Result, TextFragment};

/// Trait for object storage holding page images and derived artifacts.
///
/// Objects are addressed by `/`-separated keys inside one named container
/// (a bucket, or a directory for the local backend).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the container, recorded in every layout record.
    fn name(&self) -> &str;

    /// List every key starting with `prefix`, in lexical order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Read the raw bytes of an object.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Upload a local file's bytes to `key`.
    async fn put_file(&self, key: &str, path: &Path) -> Result<()>;
}

/// Trait for services that detect structural layout regions in a page image.
#[async_trait]
pub trait LayoutAnalyzer: Send + Sync {
    /// Submit image bytes for layout detection.
    ///
    /// Blocks come back in service-response order, which callers use as
    /// reading order.
    async fn analyze_layout(&self, image: &[u8]) -> Result<Vec<AnalysisBlock>>;
}

/// Trait for services that recognize text lines in an image.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Submit image bytes for plain text-line detection.
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextFragment>>;
}
