use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Address the HTTP API binds to when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:8001";

/// Extension (without the dot) a file needs to be treated as a document.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// The directory holding one subdirectory per report folder.
#[derive(Debug, Clone)]
pub struct ReportsRoot {
    root: PathBuf,
}

impl ReportsRoot {
    /// Resolve the reports root from, in order of priority:
    /// 1. An explicit path (from --root or DOCSHELF_ROOT)
    /// 2. The XDG data directory (~/.local/share/docshelf/reports)
    ///
    /// The directory is never created here. A missing root scans as empty.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else {
            xdg::BaseDirectories::with_prefix("docshelf")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
                .join("reports")
        };

        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn folder(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Load `KEY=value` pairs from a `.env` file in the working directory.
///
/// Returns the path that was loaded, or `None` when there is no such file.
/// Variables already present in the environment win over the file.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(Error::Config(format!("failed to load .env: {e}"))),
    }
}
