// ============================================================
// Layer 4 — Pipeline Configuration
// ============================================================
// Where the artifacts live and how long encoder inputs are.
// Stored as JSON so the same file can be shared with whatever
// produced the artifacts:
//
//   {
//     "artifact_dir":   "artifacts",
//     "tokenizer_path": "artifacts/tokenizer.json",
//     "max_seq_length": 128
//   }
//
// Every field is optional in the file; missing ones fall back
// to the defaults below.
//
// Reference: serde docs (#[serde(default)])
//            Rust Book §9 (Error Handling)

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory searched for `<name>.pkl` artifacts
    pub artifact_dir: String,

    /// HuggingFace tokenizer JSON file
    pub tokenizer_path: String,

    /// Fixed length of every tokenized sequence
    pub max_seq_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_dir:   "artifacts".to_string(),
            tokenizer_path: "artifacts/tokenizer.json".to_string(),
            max_seq_length: 128,
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        let cfg: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;

        cfg.validate()?;
        tracing::info!("Loaded pipeline config from '{}'", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_seq_length > 0, "max_seq_length must be greater than 0");
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "max_seq_length": 64 }"#).unwrap();

        let cfg = PipelineConfig::load(&path).unwrap();
        assert_eq!(cfg.max_seq_length, 64);
        assert_eq!(cfg.artifact_dir, "artifacts");
        assert_eq!(cfg.tokenizer_path, "artifacts/tokenizer.json");
    }

    #[test]
    fn test_rejects_zero_length() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "max_seq_length": 0 }"#).unwrap();

        assert!(PipelineConfig::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PipelineConfig::load(dir.path().join("nope.json")).is_err());
    }
}
