use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use rayon::prelude::*;

use crate::{
    config::DOCUMENT_EXTENSION,
    document::{self, Document},
    error::Result,
};

/// Documents grouped by folder name, iterated in folder-name order.
pub type FolderMap = BTreeMap<String, Vec<Document>>;

/// Scan `root/<folder>/*.pdf` and extract every document found.
///
/// Only one level of folders is considered: files directly under `root` and
/// anything nested deeper are ignored. Dot-prefixed names are listed like any
/// other. A missing root yields an empty map. Files that vanish or cannot be
/// stat'ed are skipped. Each folder keeps directory enumeration order.
pub fn scan(root: &Path) -> Result<FolderMap> {
    let mut folders = FolderMap::new();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(
                root = %root.display(),
                "reports directory does not exist"
            );
            return Ok(folders);
        }
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    root = %root.display(),
                    error = %e,
                    "skipping unreadable entry"
                );
                continue;
            }
        };

        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();

        let documents = scan_folder(&entry.path());
        folders.insert(name, documents);
    }

    Ok(folders)
}

/// Extract every document directly inside `dir`, in enumeration order.
pub fn scan_folder(dir: &Path) -> Vec<Document> {
    let paths = match discover_documents(dir) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(
                folder = %dir.display(),
                error = %e,
                "cannot read folder"
            );
            return Vec::new();
        }
    };

    // Extract in parallel; collect() keeps the input order.
    paths
        .par_iter()
        .filter_map(|path| match document::extract(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping document"
                );
                None
            }
        })
        .collect()
}

fn discover_documents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if is_document(&path) && path.is_file() {
            paths.push(path);
        }
    }

    Ok(paths)
}

/// Whether `path` carries the document extension. The match is
/// case-sensitive: `report.PDF` is not a document.
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == DOCUMENT_EXTENSION)
}
