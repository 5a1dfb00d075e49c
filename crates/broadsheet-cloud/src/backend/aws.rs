//! AWS backends: S3 for storage, Textract for layout analysis and OCR.

use std::path::Path;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types::{Block, Document, FeatureType};
use tracing::debug;

use crate::error::CloudError;
use crate::{
    AnalysisBlock, BoundingBox, LayoutAnalyzer, ObjectStore, Result, TextFragment,
    TextRecognizer,
};

/// Load shared AWS configuration from the default provider chain.
///
/// Credentials are resolved from the environment (`AWS_ACCESS_KEY_ID`,
/// `AWS_SECRET_ACCESS_KEY`), profiles, or instance metadata.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

/// Object store over one S3 bucket.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Create a store for `bucket`.
    pub fn new(config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        &self.bucket
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| CloudError::request("list_objects_v2", DisplayErrorContext(&e)))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }

        debug!("Listed {} objects in s3://{}/{}", keys.len(), self.bucket, prefix);
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service = e.into_service_error();
                if service.is_no_such_key() {
                    CloudError::NotFound(key.to_string())
                } else {
                    CloudError::request("get_object", DisplayErrorContext(&service))
                }
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| CloudError::request("get_object", e))?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| CloudError::request("put_object", e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| CloudError::request("put_object", DisplayErrorContext(&e)))?;

        debug!("Uploaded {} to s3://{}/{}", path.display(), self.bucket, key);
        Ok(())
    }
}

/// Textract client used for both layout analysis and text detection.
pub struct TextractService {
    client: aws_sdk_textract::Client,
}

impl TextractService {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_textract::Client::new(config),
        }
    }
}

fn document(image: &[u8]) -> Document {
    Document::builder().bytes(Blob::new(image.to_vec())).build()
}

fn analysis_block(block: &Block) -> Option<AnalysisBlock> {
    let block_type = block.block_type()?;
    let bbox = block.geometry()?.bounding_box()?;

    Some(AnalysisBlock {
        id: block.id().unwrap_or_default().to_string(),
        block_type: block_type.as_str().to_string(),
        bounding_box: BoundingBox::new(
            f64::from(bbox.left()),
            f64::from(bbox.top()),
            f64::from(bbox.width()),
            f64::from(bbox.height()),
        ),
    })
}

#[async_trait]
impl LayoutAnalyzer for TextractService {
    async fn analyze_layout(&self, image: &[u8]) -> Result<Vec<AnalysisBlock>> {
        let output = self
            .client
            .analyze_document()
            .document(document(image))
            .feature_types(FeatureType::Layout)
            .send()
            .await
            .map_err(|e| CloudError::request("analyze_document", DisplayErrorContext(&e)))?;

        let blocks: Vec<AnalysisBlock> = output.blocks().iter().filter_map(analysis_block).collect();
        debug!(
            "Textract returned {} blocks ({} with geometry)",
            output.blocks().len(),
            blocks.len()
        );

        Ok(blocks)
    }
}

#[async_trait]
impl TextRecognizer for TextractService {
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextFragment>> {
        let output = self
            .client
            .detect_document_text()
            .document(document(image))
            .send()
            .await
            .map_err(|e| {
                CloudError::request("detect_document_text", DisplayErrorContext(&e))
            })?;

        Ok(output
            .blocks()
            .iter()
            .map(|block| TextFragment {
                text: block.text().map(str::to_string),
            })
            .collect())
    }
}
