use std::{
    fs,
    panic::{self, AssertUnwindSafe},
    path::Path,
    time::SystemTime,
};

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A discovered PDF with its filesystem metadata and extracted text.
///
/// Timestamps are naive local times, as reported by the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Base file name, e.g. `Q1_2024_Revenue_Report.pdf`.
    #[serde(rename = "filename")]
    pub name: String,
    /// Absolute location on disk.
    #[serde(rename = "filepath")]
    pub path: String,
    /// Name of the folder the file sits in.
    pub folder: String,
    /// File size in bytes.
    pub size: u64,
    #[serde(rename = "created_date")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "modified_date")]
    pub modified_at: NaiveDateTime,
    /// Extracted plain text; empty when the PDF could not be read.
    #[serde(rename = "text_content")]
    pub text: String,
}

/// Outcome of pulling text out of a PDF.
///
/// A failed parse is not an error for the caller: the document is still
/// listed, only without text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextExtraction {
    Extracted(String),
    Degraded { reason: String },
}

impl TextExtraction {
    pub fn is_degraded(&self) -> bool {
        matches!(self, TextExtraction::Degraded { .. })
    }

    /// The extracted text, or an empty string for a degraded extraction.
    pub fn into_text(self) -> String {
        match self {
            TextExtraction::Extracted(text) => text,
            TextExtraction::Degraded { .. } => String::new(),
        }
    }
}

/// Concatenate the text of every page of the PDF at `path`, trimmed.
pub fn extract_text(path: &Path) -> TextExtraction {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return TextExtraction::Degraded {
                reason: format!("could not read file: {e}"),
            };
        }
    };

    // pdf-extract panics on some malformed inputs instead of returning Err.
    let parsed = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(&bytes)
    }));

    match parsed {
        Ok(Ok(text)) => TextExtraction::Extracted(text.trim().to_string()),
        Ok(Err(e)) => TextExtraction::Degraded {
            reason: e.to_string(),
        },
        Err(_) => TextExtraction::Degraded {
            reason: "PDF parser panicked".to_string(),
        },
    }
}

/// Build a [`Document`] for the file at `path`.
///
/// Fails only when the file's metadata cannot be read. Unreadable PDF
/// content yields a document with empty text.
pub fn extract(path: &Path) -> Result<Document> {
    let metadata = fs::metadata(path)?;
    let modified = metadata.modified()?;
    // Birth time is not available everywhere.
    let created = metadata.created().unwrap_or(modified);

    let extraction = extract_text(path);
    if let TextExtraction::Degraded { reason } = &extraction {
        tracing::warn!(
            path = %path.display(),
            %reason,
            "could not extract text, indexing metadata only"
        );
    }
    let text = extraction.into_text();

    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(
        path = %absolute.display(),
        size = metadata.len(),
        chars = text.len(),
        "extracted document"
    );

    Ok(Document {
        name,
        path: absolute.to_string_lossy().into_owned(),
        folder,
        size: metadata.len(),
        created_at: naive_local(created),
        modified_at: naive_local(modified),
        text,
    })
}

/// Convert a filesystem timestamp to a naive local date-time.
pub fn naive_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
