use chrono::TimeDelta;
use docshelf::{Catalog, Error, ReportsRoot, filter, search, seed, walker};

fn seeded() -> (tempfile::TempDir, Catalog) {
    let tmp = tempfile::tempdir().unwrap();
    seed::seed(tmp.path(), false).unwrap();
    let root = ReportsRoot::resolve(Some(tmp.path())).unwrap();
    (tmp, Catalog::new(root))
}

#[test]
fn revenue_search_hits_financial_report_content() {
    let (_tmp, catalog) = seeded();
    let results = catalog
        .search("revenue", filter::default_cutoff())
        .unwrap();

    let hit = results
        .iter()
        .find(|r| r.document.name == "Q1_2024_Revenue_Report.pdf")
        .unwrap();
    assert_eq!(hit.document.folder, "financial_reports");
    assert!(hit.matches.iter().any(|m| {
        m.starts_with(search::CONTENT_PREFIX)
            && m.to_lowercase().contains("revenue")
    }));

    for pair in results.windows(2) {
        assert!(pair[0].match_count >= pair[1].match_count);
    }
}

#[test]
fn cutoff_boundary_is_inclusive() {
    let (_tmp, catalog) = seeded();
    let all = catalog.folders(filter::default_cutoff()).unwrap();
    let doc = all
        .iter()
        .flat_map(|f| &f.documents)
        .find(|d| d.name == "Project_Alpha_Status.pdf")
        .unwrap();

    let visible = |cutoff| {
        catalog
            .folders(cutoff)
            .unwrap()
            .into_iter()
            .flat_map(|f| f.documents)
            .any(|d| d.name == "Project_Alpha_Status.pdf")
    };
    assert!(visible(doc.modified_at));
    assert!(!visible(doc.modified_at - TimeDelta::seconds(1)));
}

#[test]
fn counts_match_documents_after_filtering() {
    let (_tmp, catalog) = seeded();
    let cutoff = filter::default_cutoff() - TimeDelta::days(40);

    for folder in catalog.folders(cutoff).unwrap() {
        assert_eq!(folder.document_count, folder.documents.len());
        for doc in &folder.documents {
            assert!(doc.modified_at <= cutoff);
        }
    }
}

#[test]
fn info_for_missing_file_is_not_found() {
    let (_tmp, catalog) = seeded();
    let err = catalog
        .document("financial_reports", "Q9_Report.pdf")
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn rescanning_unchanged_tree_is_stable() {
    let (tmp, _catalog) = seeded();
    let first = walker::scan(tmp.path()).unwrap();
    let second = walker::scan(tmp.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn reseeding_skips_existing_files() {
    let (tmp, _catalog) = seeded();
    let report = seed::seed(tmp.path(), false).unwrap();
    assert!(report.written.is_empty());
    assert_eq!(report.skipped.len(), seed::SAMPLE_REPORTS.len());
}
