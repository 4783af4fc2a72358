//! Reads record files, checks their shape and decodes them.

mod error;
mod schema;

use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use self::error::LoadError;
use crate::error_utils::{create_named_source, span_at};
use crate::models::Record;

/// All records of one input file, in file order.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub records: Vec<Record>,
}

impl LoadedFile {
    pub fn new(path: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }
}

/// Load every file in override order. Nothing is returned unless all of
/// them are well formed.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<LoadedFile>, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoInput);
    }

    let files = paths
        .iter()
        .map(|path| load_file(path.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let records: usize = files.iter().map(|f| f.records.len()).sum();
    info!("Loaded {records} records from {} files", files.len());
    Ok(files)
}

pub fn load_file(path: &Path) -> Result<LoadedFile, LoadError> {
    debug!("Loading {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(path, content)?;
    debug!("  {} records", records.len());
    Ok(LoadedFile::new(path, records))
}

/// Parse the JSON text of a record file that lives at `path`.
pub fn parse_records(path: &Path, content: String) -> Result<Vec<Record>, LoadError> {
    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(error) => {
            let span = span_at(&content, error.line(), error.column());
            return Err(LoadError::Parse {
                path: path.to_path_buf(),
                src: create_named_source(path, content),
                span,
                error,
            });
        }
    };

    schema::check_shape(&value).map_err(|(pointer, message)| LoadError::Schema {
        path: path.to_path_buf(),
        pointer,
        message,
    })?;

    let serde_json::Value::Array(values) = value else {
        // The schema only admits arrays
        return Ok(Vec::new());
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let kind = value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string();
            serde_json::from_value(value).map_err(|error| LoadError::Decode {
                path: path.to_path_buf(),
                index,
                kind,
                error,
            })
        })
        .collect()
}
