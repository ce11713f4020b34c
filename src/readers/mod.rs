pub mod observation_reader;
pub mod yield_reader;

pub use observation_reader::{ObservationLines, ObservationReader, ParsedLine};
pub use yield_reader::{YieldFile, YieldReader};

use crate::error::{PipelineError, Result};
use crate::utils::constants::SOURCE_FILE_EXTENSION;
use std::path::{Path, PathBuf};

/// A source line that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line: u64,
    pub content: String,
    pub reason: String,
}

/// List `*.txt` files directly inside `dir`, sorted by name.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == SOURCE_FILE_EXTENSION)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Station code from a station file name (`USC00110072.txt` -> `USC00110072`).
pub fn station_code_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            PipelineError::InvalidFormat(format!(
                "Cannot derive station code from file name: {}",
                path.display()
            ))
        })
}
