//! Subcommands and the helpers they share.

pub mod config;
pub mod convert;
pub mod layout;
pub mod ocr;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aws_config::SdkConfig;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use broadsheet_cloud::{LocalStore, ObjectStore, S3Store};
use broadsheet_core::models::config::{BroadsheetConfig, StorageBackend, StorageConfig};

/// `<user config dir>/broadsheet/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("broadsheet")
        .join("config.json")
}

/// Load the configuration used by the pipeline commands.
///
/// An explicit path must exist. Without one the default file is used when
/// present, otherwise the built-in defaults. Environment overrides apply last.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BroadsheetConfig> {
    let mut config = match config_path {
        Some(path) => BroadsheetConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                BroadsheetConfig::from_file(&path)?
            } else {
                BroadsheetConfig::default()
            }
        }
    };

    config.apply_env();
    Ok(config)
}

/// Object store for the configured backend.
pub fn build_store(storage: &StorageConfig, sdk: &SdkConfig) -> Arc<dyn ObjectStore> {
    match storage.backend {
        StorageBackend::S3 => Arc::new(S3Store::new(sdk, storage.bucket.clone())),
        StorageBackend::Local => Arc::new(LocalStore::new(&storage.root)),
    }
}

/// Spinner counting finished pages; the total is only known to the driver.
pub fn page_progress() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} pages {msg}")?,
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Ok(pb)
}
