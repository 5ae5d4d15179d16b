use std::{
    io,
    path::{Component, Path, PathBuf},
};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    config::ReportsRoot,
    document::{self, Document},
    error::{Error, Result},
    filter,
    search::{self, SearchResult},
    walker,
};

/// A folder of documents as seen at some cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(rename = "pdf_count")]
    pub document_count: usize,
    #[serde(rename = "pdfs")]
    pub documents: Vec<Document>,
}

impl Folder {
    pub fn new(name: String, documents: Vec<Document>) -> Self {
        Self {
            name,
            document_count: documents.len(),
            documents,
        }
    }
}

/// Read-only view over a reports root.
///
/// Holds no state besides the root path: every call re-scans the
/// filesystem, so results always reflect what is on disk.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: ReportsRoot,
}

impl Catalog {
    pub fn new(root: ReportsRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ReportsRoot {
        &self.root
    }

    /// All folders ordered by name, each holding the documents modified at
    /// or before `cutoff`.
    pub fn folders(&self, cutoff: NaiveDateTime) -> Result<Vec<Folder>> {
        let folders = walker::scan(self.root.path())?
            .into_iter()
            .map(|(name, documents)| {
                Folder::new(name, filter::filter_by_cutoff(&documents, cutoff))
            })
            .collect();
        Ok(folders)
    }

    /// Search every folder for `query` among documents modified at or
    /// before `cutoff`.
    pub fn search(
        &self,
        query: &str,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Document> = walker::scan(self.root.path())?
            .into_values()
            .flatten()
            .collect();
        let visible = filter::filter_by_cutoff(&documents, cutoff);

        let results = search::search(&visible, query);
        tracing::debug!(
            query,
            scanned = documents.len(),
            visible = visible.len(),
            results = results.len(),
            "search complete"
        );
        Ok(results)
    }

    /// Resolve `folder/file` to an existing document on disk.
    ///
    /// Both names must be single plain path components and the file must
    /// carry the document extension; anything else is reported as not
    /// found.
    pub fn document_path(&self, folder: &str, file: &str) -> Result<PathBuf> {
        if !is_plain_name(folder) || !is_plain_name(file) {
            return Err(Error::document_not_found(folder, file));
        }

        let path = self.root.folder(folder).join(file);
        if !walker::is_document(&path) || !path.is_file() {
            return Err(Error::document_not_found(folder, file));
        }

        Ok(path)
    }

    /// Metadata and text for `folder/file`, extracted on demand.
    pub fn document(&self, folder: &str, file: &str) -> Result<Document> {
        let path = self.document_path(folder, file)?;
        document::extract(&path).map_err(|e| match e {
            Error::Io(io) if io.kind() == io::ErrorKind::NotFound => {
                Error::document_not_found(folder, file)
            }
            other => other,
        })
    }
}

fn is_plain_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;

    fn catalog(root: &Path) -> Catalog {
        Catalog::new(ReportsRoot::resolve(Some(root)).unwrap())
    }

    fn write_dated(path: &Path, contents: &[u8], mtime: SystemTime) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    fn far_future() -> NaiveDateTime {
        filter::parse_cutoff("2999-01-01T00:00:00").unwrap()
    }

    #[test]
    fn folders_are_sorted_and_counted_after_filtering() {
        let tmp = tempfile::tempdir().unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let new = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        write_dated(&tmp.path().join("zeta/old.pdf"), b"x", old);
        write_dated(&tmp.path().join("zeta/new.pdf"), b"x", new);
        write_dated(&tmp.path().join("alpha/new.pdf"), b"x", new);

        let cutoff = document::naive_local(old);
        let folders = catalog(tmp.path()).folders(cutoff).unwrap();

        let names: Vec<_> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(folders[0].document_count, 0);
        assert!(folders[0].documents.is_empty());
        assert_eq!(folders[1].document_count, 1);
        assert_eq!(folders[1].documents[0].name, "old.pdf");
    }

    #[test]
    fn folders_of_missing_root_are_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let folders = catalog(&tmp.path().join("nope"))
            .folders(far_future())
            .unwrap();
        assert!(folders.is_empty());
    }

    #[test]
    fn search_filters_before_matching() {
        let tmp = tempfile::tempdir().unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let new = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        write_dated(&tmp.path().join("finance/revenue_old.pdf"), b"x", old);
        write_dated(&tmp.path().join("finance/revenue_new.pdf"), b"x", new);

        let cat = catalog(tmp.path());
        let early = cat.search("revenue", document::naive_local(old)).unwrap();
        assert_eq!(early.len(), 1);
        assert_eq!(early[0].document.name, "revenue_old.pdf");

        let late = cat.search("revenue", far_future()).unwrap();
        let names: Vec<_> =
            late.iter().map(|r| r.document.name.as_str()).collect();
        assert_eq!(names, vec!["revenue_new.pdf", "revenue_old.pdf"]);
    }

    #[test]
    fn blank_search_skips_the_scan() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        // Scanning a file root would fail; a blank query never gets there.
        assert!(catalog(&file).search("  ", far_future()).unwrap().is_empty());
    }

    #[test]
    fn document_lookup_miss_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("finance")).unwrap();

        let err = catalog(tmp.path())
            .document("finance", "missing.pdf")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "document", .. }));
    }

    #[test]
    fn document_lookup_rejects_traversal_and_wrong_extension() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("finance")).unwrap();
        std::fs::write(tmp.path().join("secret.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("finance/notes.txt"), b"x").unwrap();

        let cat = catalog(tmp.path());
        for (folder, file) in [
            ("..", "secret.pdf"),
            ("finance", "../secret.pdf"),
            ("finance", "notes.txt"),
            (".", "secret.pdf"),
            ("", "secret.pdf"),
        ] {
            assert!(
                matches!(
                    cat.document_path(folder, file),
                    Err(Error::NotFound { .. })
                ),
                "{folder}/{file} should not resolve"
            );
        }
    }

    #[test]
    fn document_info_is_extracted_on_demand() {
        let tmp = tempfile::tempdir().unwrap();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_650_000_000);
        write_dated(&tmp.path().join("finance/corrupt.pdf"), b"12345", mtime);

        let doc = catalog(tmp.path())
            .document("finance", "corrupt.pdf")
            .unwrap();
        assert_eq!(doc.name, "corrupt.pdf");
        assert_eq!(doc.folder, "finance");
        assert_eq!(doc.size, 5);
        assert_eq!(doc.text, "");
        assert_eq!(doc.modified_at, document::naive_local(mtime));
    }

    #[test]
    fn folder_serializes_with_wire_names() {
        let value =
            serde_json::to_value(Folder::new("x".into(), vec![])).unwrap();
        assert_eq!(value["name"], "x");
        assert_eq!(value["pdf_count"], 0);
        assert!(value["pdfs"].as_array().unwrap().is_empty());
    }
}
