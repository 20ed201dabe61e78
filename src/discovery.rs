//! Discovery Module for the Spec Compiler
//!
//! Lists the entries directly inside the input directory. There is no
//! extension filter: anything other than an ignored OS artifact is a spec.
//! Only a failure to read the directory itself is a listing error; an entry
//! that cannot be inspected is still returned and fails when processed.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SpecError};
use crate::options::BatchConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFile {
    pub path: PathBuf,
    /// File name without the directory, used as the progress label.
    pub name: String,
}

fn list_error(dir: &Path, source: std::io::Error) -> SpecError {
    SpecError::ListDir {
        path: dir.to_path_buf(),
        source,
    }
}

pub fn discover_specs(config: &BatchConfig) -> Result<Vec<SpecFile>> {
    let dir = config.input_dir.as_path();

    let metadata = fs::metadata(dir).map_err(|e| list_error(dir, e))?;
    if !metadata.is_dir() {
        return Err(list_error(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if config.sort_entries {
        walker = walker.sort_by_file_name();
    }

    let mut specs = Vec::new();
    for entry in walker {
        let path = match entry {
            Ok(entry) => entry.path().to_path_buf(),
            Err(e) => match e.path() {
                Some(path) if e.depth() > 0 => {
                    tracing::debug!("Could not inspect {}: {}", path.display(), e);
                    path.to_path_buf()
                }
                _ => return Err(list_error(dir, e.into())),
            },
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if config.is_ignored(&name) {
            tracing::debug!("Skipping OS artifact {}", name);
            continue;
        }
        specs.push(SpecFile { path, name });
    }

    Ok(specs)
}
