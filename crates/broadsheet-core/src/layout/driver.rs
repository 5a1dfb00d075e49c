//! Batch layout extraction over every page under a storage prefix.

use tracing::info;

use broadsheet_cloud::ObjectStore;

use crate::batch::{BatchRunner, FailurePolicy, ItemOutcome};
use crate::error::Result;
use crate::models::config::StorageConfig;
use crate::models::layout::LayoutRecord;

use super::LayoutExtractor;

/// Keys under `prefix` ending with `suffix`, in lexical order.
pub async fn list_pages(store: &dyn ObjectStore, prefix: &str, suffix: &str) -> Result<Vec<String>> {
    let mut pages: Vec<String> = store
        .list(prefix)
        .await?
        .into_iter()
        .filter(|key| key.ends_with(suffix))
        .collect();
    pages.sort();
    Ok(pages)
}

/// Extract the layout of every page image, `concurrency` pages at a time.
///
/// Previews are never rendered here. Pages fail independently: a failed page
/// shows up as a degraded record and never stops the batch. Only listing
/// the pages can fail the call as a whole.
pub async fn run_layout_batch<P>(
    extractor: &LayoutExtractor,
    storage: &StorageConfig,
    concurrency: usize,
    mut on_page_done: P,
) -> Result<Vec<LayoutRecord>>
where
    P: FnMut(&LayoutRecord),
{
    let pages = list_pages(extractor.store(), &storage.prefix, &storage.image_suffix).await?;
    info!(
        "Analyzing layout of {} pages under {}/{}",
        pages.len(),
        extractor.store().name(),
        storage.prefix
    );

    let runner = BatchRunner::new(concurrency, FailurePolicy::Isolate);
    let report = runner
        .run_with_progress(
            pages,
            |document: String| async move { Ok(extractor.extract(&document, false).await) },
            |outcome| {
                if let ItemOutcome::Done { value, .. } = outcome {
                    on_page_done(value);
                }
            },
        )
        .await;

    report.into_result()
}
