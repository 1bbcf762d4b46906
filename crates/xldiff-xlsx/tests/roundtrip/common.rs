//! Common utilities for round-trip tests.

use tempfile::TempDir;
use xldiff_core::Workbook;
use xldiff_xlsx::{XlsxReader, XlsxWriter};

/// Write `workbook` to a file in a fresh temporary directory and read it back.
///
/// The directory is removed when the returned guard is dropped, so callers
/// keep it alive for as long as they need the file.
pub fn roundtrip(workbook: &Workbook) -> (Workbook, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("roundtrip.xlsx");

    XlsxWriter::write_file(workbook, &path).expect("write workbook");
    let read = XlsxReader::read_file(&path).expect("read workbook");

    (read, dir)
}
