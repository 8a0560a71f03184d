use crate::error::{ProcessingError, Result};
use crate::utils::constants::RECOGNIZED_EXTENSIONS;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory entry considered for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveredFile {
    /// A station file with a recognized extension
    Station(PathBuf),
    /// A file that will not be ingested, with the reason
    Skipped { path: PathBuf, reason: String },
}

impl DiscoveredFile {
    pub fn path(&self) -> &Path {
        match self {
            DiscoveredFile::Station(path) => path,
            DiscoveredFile::Skipped { path, .. } => path,
        }
    }
}

/// List the entries directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Symlinks are followed; one that
/// does not resolve to a regular file is reported as skipped.
pub fn discover_files(dir: &Path) -> Result<Vec<DiscoveredFile>> {
    if !dir.is_dir() {
        return Err(ProcessingError::Config(format!(
            "Data directory does not exist: {}",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths.into_iter().map(classify).collect())
}

fn classify(path: PathBuf) -> DiscoveredFile {
    if !path.is_file() {
        return DiscoveredFile::Skipped {
            path,
            reason: "not a regular file".to_string(),
        };
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension {
        Some(ext) if RECOGNIZED_EXTENSIONS.contains(&ext.as_str()) => DiscoveredFile::Station(path),
        Some(ext) => DiscoveredFile::Skipped {
            path,
            reason: format!("unrecognized extension '.{}'", ext),
        },
        None => DiscoveredFile::Skipped {
            path,
            reason: "no file extension".to_string(),
        },
    }
}

/// Station identifier for a file: its base name with the extension stripped
/// (e.g. `data/USC00110072.txt` -> `USC00110072`).
pub fn station_id_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Cannot derive station ID from file name: {}",
                path.display()
            ))
        })
}
