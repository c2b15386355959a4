use std::path::PathBuf;
use serde::{Serialize, Deserialize};

/// When tuple-log writers force data to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    Immediate,  // fsync after every insert
    Batch,      // fsync on close
    None,       // Let OS handle it
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_path: PathBuf,
    pub sync_mode: SyncMode,

    pub progress_interval: usize,       // Records between ingestion progress logs
    pub record_context_chars: usize,    // Max chars of a failing record echoed into errors
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./data"),
            sync_mode: SyncMode::Batch,
            progress_interval: 10_000,
            record_context_chars: 256,
        }
    }
}

impl Config {
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"sync_mode":"Immediate"}"#).unwrap();
        assert_eq!(config.sync_mode, SyncMode::Immediate);
        assert_eq!(config.progress_interval, 10_000);
        assert_eq!(config.storage_path, PathBuf::from("./data"));
    }
}
