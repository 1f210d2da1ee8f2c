//! Table retrieval for scenario datasets.
//!
//! The pipeline only sees the `TableSource` trait; whether a dataset comes
//! from the cloud manifest or a local directory is wiring decided at the
//! command layer. "Key not published" and "retrieval broke" stay distinct
//! error kinds all the way up, so operators can tell no-data from a broken
//! pipe.

use log::{info, warn};
use owf_scenario::error::{OwfError, Result};
use owf_scenario::family::DatasetKey;
use owf_scenario::table::TimeSeriesTable;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL for cloud-hosted dataset files; the manifest supplies the id.
pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/uc?export=download&id=";

/// A collaborator that turns a dataset key into a loaded table.
#[allow(async_fn_in_trait)]
pub trait TableSource {
    async fn fetch(&self, key: &DatasetKey) -> Result<TimeSeriesTable>;
}

/// Fetches datasets from cloud storage via a manifest of key -> file id.
///
/// The manifest is injected read-only state, loaded once by the caller;
/// nothing here is process-global.
pub struct ManifestSource {
    manifest: HashMap<String, String>,
    client: reqwest::Client,
    base_url: String,
}

impl ManifestSource {
    /// Parse a manifest JSON body: an object of dataset key to file id.
    pub fn from_json_str(body: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(body)
            .map_err(|e| OwfError::Manifest(e.to_string()))?;
        let object = root
            .as_object()
            .ok_or_else(|| OwfError::Manifest("expected a JSON object".to_string()))?;
        let mut manifest = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let file_id = value.as_str().ok_or_else(|| {
                OwfError::Manifest(format!("file id for {key} is not a string"))
            })?;
            manifest.insert(key.clone(), file_id.to_string());
        }
        Ok(ManifestSource {
            manifest,
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Load a manifest from a JSON file on disk.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let body = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&body)?)
    }

    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.is_empty()
    }
}

impl TableSource for ManifestSource {
    /// Download and parse one dataset, with retry and exponential backoff.
    async fn fetch(&self, key: &DatasetKey) -> Result<TimeSeriesTable> {
        let file_id = self
            .manifest
            .get(key.as_str())
            .ok_or_else(|| OwfError::DatasetNotFound(key.to_string()))?;
        let url = format!("{}{}", self.base_url, file_id);

        let max_tries = 3;
        let mut sleep_millis: u64 = 1000;
        for attempt in 1..=max_tries {
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.text().await {
                        Ok(body) => {
                            return TimeSeriesTable::from_csv_str(&body).map_err(|e| {
                                OwfError::Fetch {
                                    key: key.to_string(),
                                    reason: e.to_string(),
                                }
                            });
                        }
                        Err(e) => {
                            warn!(
                                "attempt {attempt}/{max_tries}: failed to read body for {key}: {e}"
                            );
                        }
                    }
                }
                Ok(response) => {
                    warn!(
                        "attempt {attempt}/{max_tries}: bad response status for {key}: {}",
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("attempt {attempt}/{max_tries}: request failed for {key}: {e}");
                }
            }

            if attempt < max_tries {
                info!("sleeping {sleep_millis} ms before retrying {key}");
                tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
                sleep_millis *= 2;
            }
        }

        Err(OwfError::Fetch {
            key: key.to_string(),
            reason: format!("all {max_tries} attempts failed"),
        })
    }
}

/// Reads pre-downloaded dataset files `<dir>/<key>` from disk.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: PathBuf) -> Self {
        DirSource { dir }
    }
}

impl TableSource for DirSource {
    async fn fetch(&self, key: &DatasetKey) -> Result<TimeSeriesTable> {
        let path = self.dir.join(key.as_str());
        if !path.exists() {
            return Err(OwfError::DatasetNotFound(key.to_string()));
        }
        let body = std::fs::read_to_string(&path).map_err(|e| OwfError::Fetch {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        TimeSeriesTable::from_csv_str(&body).map_err(|e| OwfError::Fetch {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Source selected by command-line flags.
pub enum Source {
    Dir(DirSource),
    Manifest(ManifestSource),
}

impl TableSource for Source {
    async fn fetch(&self, key: &DatasetKey) -> Result<TimeSeriesTable> {
        match self {
            Source::Dir(source) => source.fetch(key).await,
            Source::Manifest(source) => source.fetch(key).await,
        }
    }
}
