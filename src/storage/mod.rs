// src/storage/mod.rs
use crate::utils::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata written alongside the run outputs.
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    pub source_url: String,
    pub fetched_at: String,
    pub rows_total: usize,
    pub rows_selected: usize,
    pub teams_selected: Vec<String>,
    pub positions_selected: Vec<String>,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::Io)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes the CSV export of the filtered dataset.
    pub fn save_csv(&self, name: &str, content: &str) -> Result<PathBuf, StorageError> {
        self.write(&self.base_dir.join(format!("{}.csv", name)), content)
    }

    /// Writes a rendered chart; the extension comes from the renderer.
    pub fn save_chart(&self, name: &str, ext: &str, content: &str) -> Result<PathBuf, StorageError> {
        self.write(&self.base_dir.join(format!("{}.{}", name, ext)), content)
    }

    /// Writes run metadata in JSON format.
    pub fn save_metadata(&self, metadata: &RunMetadata) -> Result<PathBuf, StorageError> {
        let json = serde_json::to_string_pretty(metadata)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write(&self.base_dir.join("run_meta.json"), &json)
    }

    /// Writes a debug HTML dump (raw page, extracted fragment) under debug/.
    pub fn save_debug_html(&self, name: &str, content: &str) -> Result<PathBuf, StorageError> {
        let debug_dir = self.base_dir.join("debug");
        if !debug_dir.exists() {
            fs::create_dir_all(&debug_dir).map_err(StorageError::Io)?;
        }
        self.write(&debug_dir.join(format!("{}.html", name)), content)
    }

    fn write(&self, path: &Path, content: &str) -> Result<PathBuf, StorageError> {
        fs::write(path, content).map_err(StorageError::Io)?;
        tracing::info!("Saved {}", path.display());
        Ok(path.to_path_buf())
    }
}
