use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{document::Document, text_util};

/// Maximum number of content snippets reported per document.
pub const MAX_CONTENT_MATCHES: usize = 3;

pub const FILENAME_PREFIX: &str = "Filename: ";
pub const CONTENT_PREFIX: &str = "Content: ";

/// One document that matched a query, with a readable line per match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "pdf")]
    pub document: Document,
    /// Each entry starts with [`FILENAME_PREFIX`] or [`CONTENT_PREFIX`].
    pub matches: Vec<String>,
    pub match_count: usize,
}

/// Search `documents` for a case-insensitive substring.
///
/// A document matches on its file name (one entry) and on up to
/// [`MAX_CONTENT_MATCHES`] sentence-like segments of its text. Results are
/// ordered by descending match count, then file name. A blank query
/// returns nothing.
pub fn search(documents: &[Document], query: &str) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();
    let mut results: Vec<SearchResult> = documents
        .iter()
        .filter_map(|doc| match_document(doc, &query_lower))
        .collect();

    results.sort_by(by_relevance);
    results
}

/// Relevance order: more matches first, then file name ascending.
pub fn by_relevance(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.match_count
        .cmp(&a.match_count)
        .then_with(|| a.document.name.cmp(&b.document.name))
}

fn match_document(doc: &Document, query_lower: &str) -> Option<SearchResult> {
    let mut matches = Vec::new();

    if doc.name.to_lowercase().contains(query_lower) {
        matches.push(format!("{FILENAME_PREFIX}{}", doc.name));
    }

    matches.extend(
        content_snippets(&doc.text, query_lower)
            .into_iter()
            .map(|snippet| format!("{CONTENT_PREFIX}{snippet}")),
    );

    if matches.is_empty() {
        return None;
    }

    Some(SearchResult {
        document: doc.clone(),
        match_count: matches.len(),
        matches,
    })
}

fn content_snippets(text: &str, query_lower: &str) -> Vec<String> {
    if text.is_empty() || !text.to_lowercase().contains(query_lower) {
        return Vec::new();
    }

    text_util::segments(text)
        .filter(|segment| segment.to_lowercase().contains(query_lower))
        .filter_map(|segment| text_util::snippet(segment, query_lower))
        .take(MAX_CONTENT_MATCHES)
        .collect()
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for (i, r) in results.iter().enumerate() {
        println!(
            "{:>3}. [{}] {}/{}",
            i + 1,
            r.match_count,
            r.document.folder,
            r.document.name
        );
        for m in &r.matches {
            println!("     {m}");
        }
    }
    println!("\n{} result(s)", results.len());
}
