//! HTTP API over a [`Catalog`].
//!
//! Every route lives under `/api`. Scans run on the blocking pool so the
//! async workers stay free while PDFs are parsed.

use std::{io, sync::Arc};

use axum::{
    Json,
    Router,
    body::{Body, Bytes},
    extract::{Path, Query, Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::Stream;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;

use crate::{
    catalog::{Catalog, Folder},
    document::Document,
    error::{Error, Result},
    filter,
    search::SearchResult,
};

const API_MESSAGE: &str = "PDF Reports Management API";

/// Read size for streamed document bodies.
const CHUNK_SIZE: usize = 64 * 1024;

/// RFC 5987 `attr-char` minus the alphanumerics.
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct CutoffParams {
    target_datetime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
    target_datetime: Option<String>,
}

/// Build the API router for `catalog`.
pub fn router(catalog: Catalog) -> Router {
    let state = AppState {
        catalog: Arc::new(catalog),
    };

    Router::new()
        .route("/api", get(index))
        .route("/api/", get(index))
        .route("/api/folders", get(list_folders))
        .route("/api/search", get(search))
        .route("/api/pdf/{folder}/{file}", get(fetch_pdf))
        .route("/api/pdf-info/{folder}/{file}", get(pdf_info))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Serve the API on `bind` until Ctrl-C.
pub async fn serve(catalog: Catalog, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| Error::Server(format!("cannot bind {bind}: {e}")))?;
    let addr = listener.local_addr()?;

    tracing::info!(
        %addr,
        root = %catalog.root().path().display(),
        "serving reports"
    );

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    tracing::info!("server stopped");
    Ok(())
}

/// Blocking entry point for the CLI: owns the tokio runtime.
pub fn run(catalog: Catalog, bind: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(serve(catalog, bind))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

async fn index() -> Json<MessageBody> {
    Json(MessageBody {
        message: API_MESSAGE,
    })
}

async fn list_folders(
    State(state): State<AppState>,
    Query(params): Query<CutoffParams>,
) -> Result<Json<Vec<Folder>>> {
    let cutoff = filter::resolve_cutoff(params.target_datetime.as_deref())?;
    let catalog = Arc::clone(&state.catalog);
    let folders = run_blocking(move || catalog.folders(cutoff)).await?;
    Ok(Json(folders))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>> {
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let cutoff = filter::resolve_cutoff(params.target_datetime.as_deref())?;
    let catalog = Arc::clone(&state.catalog);
    let results =
        run_blocking(move || catalog.search(&params.q, cutoff)).await?;
    Ok(Json(results))
}

async fn fetch_pdf(
    State(state): State<AppState>,
    Path((folder, file)): Path<(String, String)>,
) -> Result<Response> {
    let path = {
        let catalog = Arc::clone(&state.catalog);
        let (folder, file) = (folder.clone(), file.clone());
        run_blocking(move || catalog.document_path(&folder, &file)).await?
    };
    let handle = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::document_not_found(&folder, &file)
        } else {
            e.into()
        }
    })?;
    let len = handle.metadata().await?.len();

    tracing::debug!(%folder, %file, bytes = len, "streaming document");

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (header::CONTENT_LENGTH, HeaderValue::from(len)),
        (header::CONTENT_DISPOSITION, content_disposition(&file)?),
    ];
    Ok((headers, Body::from_stream(file_stream(handle))).into_response())
}

async fn pdf_info(
    State(state): State<AppState>,
    Path((folder, file)): Path<(String, String)>,
) -> Result<Json<Document>> {
    let catalog = Arc::clone(&state.catalog);
    let document =
        run_blocking(move || catalog.document(&folder, &file)).await?;
    Ok(Json(document))
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Server(format!("blocking task failed: {e}")))?
}

fn file_stream(
    file: tokio::fs::File,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    futures::stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0; CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok::<_, io::Error>(Some((Bytes::from(buf), file)))
    })
}

/// `inline` disposition carrying the file name both as a plain ASCII
/// fallback and as an RFC 5987 UTF-8 value.
fn content_disposition(file: &str) -> Result<HeaderValue> {
    let fallback: String = file
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(file, FILENAME_ENCODE_SET);

    HeaderValue::from_str(&format!(
        "inline; filename=\"{fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .map_err(|e| Error::Server(format!("bad Content-Disposition: {e}")))
}

/// Allow any origin, method and header. Preflight requests are answered
/// here without reaching a handler.
async fn cors(request: Request, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let allow_methods = request
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_METHOD)
        .cloned()
        .unwrap_or(HeaderValue::from_static("GET, OPTIONS"));
    let allow_headers = request
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    match origin {
        // Credentials cannot be combined with a wildcard origin.
        Some(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.append(header::VARY, HeaderValue::from_static("origin"));
        }
        None => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
    }
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, allow_methods);
    if let Some(allow_headers) = allow_headers {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
    }

    response
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Error::InvalidCutoff(_) => {
                (StatusCode::BAD_REQUEST, "Invalid datetime format")
            }
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "PDF not found"),
            _ => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_keeps_plain_names() {
        let value = content_disposition("Q1_2024_Report.pdf").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "inline; filename=\"Q1_2024_Report.pdf\"; \
             filename*=UTF-8''Q1_2024_Report.pdf"
        );
    }

    #[test]
    fn disposition_encodes_unicode_and_quotes() {
        let value = content_disposition("résumé \"final\".pdf").unwrap();
        let value = value.to_str().unwrap();
        assert!(value.contains("filename=\"r_sum_ _final_.pdf\""));
        assert!(value.contains(
            "filename*=UTF-8''r%C3%A9sum%C3%A9%20%22final%22.pdf"
        ));
    }

    #[test]
    fn errors_map_to_status_codes() {
        let cases = [
            (Error::InvalidCutoff("x".into()), StatusCode::BAD_REQUEST),
            (
                Error::document_not_found("a", "b.pdf"),
                StatusCode::NOT_FOUND,
            ),
            (
                Error::Io(io::Error::other("disk on fire")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
