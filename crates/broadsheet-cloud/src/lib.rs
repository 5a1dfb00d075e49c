//! Service abstraction layer for broadsheet.
//!
//! This crate provides a unified interface over the external capabilities
//! the pipeline depends on:
//! - object storage for page images and derived artifacts
//! - layout analysis returning normalized region boxes
//! - text recognition returning text fragments
//!
//! Backends: AWS S3 + Textract (`aws` feature) and a local filesystem store.

mod backend;
mod error;
mod types;

pub use backend::local::LocalStore;
pub use backend::{LayoutAnalyzer, ObjectStore, TextRecognizer};
pub use error::CloudError;
pub use types::{AnalysisBlock, BoundingBox, TextFragment};

#[cfg(feature = "aws")]
pub use backend::aws::{load_sdk_config, S3Store, TextractService};

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, CloudError>;
