//! docshelf - browse, filter and search folders of PDF reports.
//!
//! A reports root holds one subdirectory per folder, each containing PDF
//! files. docshelf scans that tree on every request, extracts each PDF's
//! text with [pdf-extract](https://crates.io/crates/pdf-extract), hides
//! documents modified after a cutoff, and answers substring searches with
//! sentence-level snippets. The same operations are exposed over an HTTP
//! API ([`server`]) and the `docshelf` CLI.
//!
//! # Quick start
//!
//! ```no_run
//! use docshelf::{Catalog, ReportsRoot, filter};
//!
//! let root = ReportsRoot::resolve(Some("/srv/reports".as_ref())).unwrap();
//! let catalog = Catalog::new(root);
//!
//! let cutoff = filter::resolve_cutoff(Some("2024-06-30T23:59:59")).unwrap();
//! for r in catalog.search("revenue", cutoff).unwrap() {
//!     println!(
//!         "{}/{} ({} matches)",
//!         r.document.folder, r.document.name, r.match_count
//!     );
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod search;
pub mod seed;
pub mod server;
pub mod text_util;
pub mod walker;

pub use catalog::{Catalog, Folder};
pub use config::ReportsRoot;
pub use document::Document;
pub use error::{Error, Result};
pub use search::SearchResult;
