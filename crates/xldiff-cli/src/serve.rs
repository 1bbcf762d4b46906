//! Upload/compare/download HTTP service

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path as UrlPath, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use xldiff::report::html::render_document;
use xldiff::report::{styled_workbook, ReportStyle};
use xldiff::{Comparator, CsvReadOptions, CsvReader, Workbook, XlsxReader, XlsxWriter};

use crate::store::ResultStore;

/// Name offered for the downloaded report
pub const RESULT_FILE_NAME: &str = "comparison_result.xlsx";

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub result_ttl: Duration,
    pub max_results: usize,
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("No files uploaded")]
    MissingFile,

    #[error("No selected file")]
    EmptyFile,

    #[error("invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("could not read '{name}': {message}")]
    Unreadable { name: String, message: String },

    #[error("unknown or expired result")]
    NotFound,

    #[error("comparison failed: {0}")]
    Internal(String),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServeError::MissingFile
            | ServeError::EmptyFile
            | ServeError::Multipart(_)
            | ServeError::Unreadable { .. } => StatusCode::BAD_REQUEST,
            ServeError::NotFound => StatusCode::NOT_FOUND,
            ServeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("request failed: {}", self);
        } else {
            warn!("request rejected: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[derive(Clone)]
struct AppState {
    comparator: Arc<Comparator>,
    style: ReportStyle,
    store: Arc<Mutex<ResultStore>>,
}

/// An uploaded workbook file
pub struct Upload {
    pub file_name: String,
    pub data: Bytes,
}

/// What a comparison produces for the browser
pub struct Outcome {
    pub html: String,
    pub report: Vec<u8>,
    pub total_diffs: usize,
}

pub fn router(comparator: Comparator, options: &ServeOptions) -> Router {
    let state = AppState {
        comparator: Arc::new(comparator),
        style: ReportStyle::default(),
        store: Arc::new(Mutex::new(ResultStore::new(
            options.result_ttl,
            options.max_results,
        ))),
    };

    Router::new()
        .route("/", get(index))
        .route("/compare", post(compare))
        .route("/download/:token", get(download))
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .with_state(state)
}

pub async fn run(comparator: Comparator, options: ServeOptions) -> anyhow::Result<()> {
    let app = router(comparator, &options);
    info!("xldiff listening on http://{}", options.addr);

    let listener = tokio::net::TcpListener::bind(options.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn compare(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ServeError> {
    let mut file1 = None;
    let mut file2 = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some("file1") => &mut file1,
            Some("file2") => &mut file2,
            _ => continue,
        };
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        *slot = Some(Upload { file_name, data });
    }

    let (Some(left), Some(right)) = (file1, file2) else {
        return Err(ServeError::MissingFile);
    };
    if left.file_name.is_empty() || right.file_name.is_empty() {
        return Err(ServeError::EmptyFile);
    }

    let comparator = Arc::clone(&state.comparator);
    let style = state.style;
    let outcome = tokio::task::spawn_blocking(move || run_comparison(&comparator, &style, &left, &right))
        .await
        .map_err(|e| ServeError::Internal(e.to_string()))??;

    let (token, stored) = {
        let mut store = state
            .store
            .lock()
            .map_err(|_| ServeError::Internal("result store poisoned".to_string()))?;
        let token = store.insert(Bytes::from(outcome.report));
        (token, store.len())
    };
    info!(%token, diffs = outcome.total_diffs, stored, "comparison ready");

    let link = format!(
        "<p class=\"download\"><a href=\"/download/{token}\">Download {RESULT_FILE_NAME}</a> \
         ({} differing cells)</p>",
        outcome.total_diffs
    );
    Ok(Html(outcome.html.replacen(DOWNLOAD_SLOT, &link, 1)))
}

async fn download(
    State(state): State<AppState>,
    UrlPath(token): UrlPath<String>,
) -> Result<Response, ServeError> {
    let token = Uuid::parse_str(&token).map_err(|_| ServeError::NotFound)?;
    let data = state
        .store
        .lock()
        .map_err(|_| ServeError::Internal("result store poisoned".to_string()))?
        .get(&token)
        .ok_or(ServeError::NotFound)?;

    let disposition = format!("attachment; filename=\"{RESULT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

const DOWNLOAD_SLOT: &str = "<!--download-->";

/// Read both uploads, compare them and render the HTML page and XLSX report
pub fn run_comparison(
    comparator: &Comparator,
    style: &ReportStyle,
    left: &Upload,
    right: &Upload,
) -> Result<Outcome, ServeError> {
    let left_book = read_upload(left)?;
    let right_book = read_upload(right)?;

    let comparison = comparator.compare(&left_book, &right_book);
    let report = styled_workbook(&comparison, style).map_err(|e| ServeError::Internal(e.to_string()))?;

    let mut buf = Vec::new();
    XlsxWriter::write(&report, Cursor::new(&mut buf))
        .map_err(|e| ServeError::Internal(e.to_string()))?;

    let title = format!("{} vs {}", left.file_name, right.file_name);
    Ok(Outcome {
        html: render_document(&comparison, &title, Some(DOWNLOAD_SLOT)),
        report: buf,
        total_diffs: comparison.total_diffs(),
    })
}

/// Parse an upload as CSV/TSV by file extension, otherwise as XLSX
pub fn read_upload(upload: &Upload) -> Result<Workbook, ServeError> {
    let extension = Path::new(&upload.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    let unreadable = |message: String| ServeError::Unreadable {
        name: upload.file_name.clone(),
        message,
    };

    match extension.as_deref() {
        Some("csv") => CsvReader::read(upload.data.as_ref(), &CsvReadOptions::default())
            .map_err(|e| unreadable(e.to_string())),
        Some("tsv") => CsvReader::read(upload.data.as_ref(), &CsvReadOptions::tsv())
            .map_err(|e| unreadable(e.to_string())),
        _ => XlsxReader::read(Cursor::new(upload.data.as_ref()))
            .map_err(|e| unreadable(e.to_string())),
    }
}

const INDEX_PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8" />
<title>xldiff</title>
<style>
body{font-family:system-ui,-apple-system,"Segoe UI",Arial,sans-serif;margin:32px;}
form{display:grid;gap:12px;max-width:420px;}
label{font-size:13px;color:#555;}
</style>
</head>
<body>
<h1>Compare spreadsheets</h1>
<form action="/compare" method="post" enctype="multipart/form-data">
<label>Original file <input type="file" name="file1" accept=".xlsx,.xlsm,.csv,.tsv" required /></label>
<label>Changed file <input type="file" name="file2" accept=".xlsx,.xlsm,.csv,.tsv" required /></label>
<button type="submit">Compare</button>
</form>
<p>Header cells are shown in green, key cells in yellow and changed values in red.</p>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xldiff::CellValue;

    fn xlsx_upload(name: &str, price: i32) -> Upload {
        let mut wb = Workbook::new();
        let ws = wb.worksheet_mut(0).unwrap();
        ws.set_cell_value("A1", "SKU").unwrap();
        ws.set_cell_value("B1", "Price").unwrap();
        ws.set_cell_value("A2", "A-1").unwrap();
        ws.set_cell_value("B2", price).unwrap();

        let mut buf = Vec::new();
        XlsxWriter::write(&wb, Cursor::new(&mut buf)).unwrap();
        Upload {
            file_name: name.to_string(),
            data: Bytes::from(buf),
        }
    }

    #[test]
    fn test_run_comparison() {
        let outcome = run_comparison(
            &Comparator::new(),
            &ReportStyle::default(),
            &xlsx_upload("old.xlsx", 10),
            &xlsx_upload("new.xlsx", 12),
        )
        .unwrap();

        assert_eq!(outcome.total_diffs, 1);
        assert!(outcome.html.contains("<td class=\"diff\">10</td>"));
        assert!(outcome.html.contains(DOWNLOAD_SLOT));
        assert!(outcome.html.contains("old.xlsx vs new.xlsx"));

        let report = XlsxReader::read(Cursor::new(&outcome.report)).unwrap();
        let ws = report.worksheet(0).unwrap();
        assert_eq!(ws.get_value("B2").unwrap(), CellValue::from(10));
        assert!(ws.cell_style("B2").unwrap().is_some());
    }

    #[test]
    fn test_read_upload_by_extension() {
        let csv = Upload {
            file_name: "data.CSV".to_string(),
            data: Bytes::from_static(b"ID,V\n1,a\n"),
        };
        let wb = read_upload(&csv).unwrap();
        assert_eq!(wb.worksheet(0).unwrap().get_value("A2").unwrap(), CellValue::from(1));

        let broken = Upload {
            file_name: "data.xlsx".to_string(),
            data: Bytes::from_static(b"not a zip"),
        };
        match read_upload(&broken) {
            Err(ServeError::Unreadable { name, .. }) => assert_eq!(name, "data.xlsx"),
            other => panic!("expected unreadable upload, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_router_builds() {
        let options = ServeOptions {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            max_upload_bytes: 1024,
            result_ttl: Duration::from_secs(1),
            max_results: 1,
        };
        let _app = router(Comparator::new(), &options);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ServeError::MissingFile.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServeError::EmptyFile.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServeError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServeError::Internal("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
