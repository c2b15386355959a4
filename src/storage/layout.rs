use std::path::PathBuf;
use std::fs;
use crate::core::error::Result;

/// Directory structure for table files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,      // Root directory
    pub tables_dir: PathBuf,    // One tuple log + schema file per table
}

impl StorageLayout {
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        let tables_dir = base_dir.join("tables");
        fs::create_dir_all(&tables_dir)?;

        Ok(StorageLayout {
            base_dir,
            tables_dir,
        })
    }

    pub fn table_log_path(&self, table: &str) -> PathBuf {
        self.tables_dir.join(format!("{}.tlog", table))
    }

    pub fn table_schema_path(&self, table: &str) -> PathBuf {
        self.tables_dir.join(format!("{}.schema.json", table))
    }

    /// Names of tables that have a schema file
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        for entry in fs::read_dir(&self.tables_dir)? {
            let name = entry?.file_name();
            if let Some(table) = name.to_str().and_then(|n| n.strip_suffix(".schema.json")) {
                tables.push(table.to_string());
            }
        }
        tables.sort();
        Ok(tables)
    }
}
