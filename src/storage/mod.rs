// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{ParseOutcome, ParseResult};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// `<base_dir>/<stem>/`, created on demand.
    pub fn document_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        if stem.is_empty() || stem == "." || stem == ".." || stem.contains(['/', '\\']) {
            return Err(StorageError::InvalidName(stem.to_string()));
        }

        let target_dir = self.base_dir.join(stem);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)?;
        }
        Ok(target_dir)
    }

    /// Saves the parse result as pretty JSON
    pub fn save_result(&self, stem: &str, result: &ParseResult) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(format!("{}_parse.json", stem));

        let json = serde_json::to_string_pretty(result)?;
        fs::write(&file_path, json)?;

        tracing::info!("Saved parse result to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves a summary of the parse (counts, weight check, strategy) in JSON format
    pub fn save_report(&self, stem: &str, outcome: &ParseOutcome) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(format!("{}_report.json", stem));

        let report = serde_json::json!({
            "document": stem,
            "evaluation_count": outcome.result.evaluations.len(),
            "schedule_count": outcome.result.schedule.len(),
            "total_weight": outcome.result.total_weight(),
            "strategy": outcome.strategy,
            "weight_diagnostic": outcome.diagnostic,
            "metadata": outcome.result.metadata,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        fs::write(&file_path, serde_json::to_string_pretty(&report)?)?;

        tracing::info!("Saved report to {}", file_path.display());
        Ok(file_path)
    }
}
