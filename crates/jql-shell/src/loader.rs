//! JSON file loading

use std::fs;
use std::path::{Path, PathBuf};

use jql::{LoadError, Row, RowSource, rows_from_json};

/// Reads tables from JSON files holding an array of objects.
///
/// Relative paths resolve against `root` when one is set, otherwise against
/// the working directory.
#[derive(Debug, Clone, Default)]
pub struct JsonFileLoader {
    root: Option<PathBuf>,
}

impl JsonFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) if Path::new(path).is_relative() => root.join(path),
            _ => PathBuf::from(path),
        }
    }
}

impl RowSource for JsonFileLoader {
    fn load(&self, path: &str) -> Result<Vec<Row>, LoadError> {
        let resolved = self.resolve(path);
        log::debug!("reading {}", resolved.display());

        let bytes = fs::read(&resolved)?;
        let document: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(rows_from_json(document)?)
    }
}

/// Check if a file looks like a JSON table
pub fn is_json_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("json"))
}
