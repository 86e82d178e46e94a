//! CSV ingestion into polars frames

use crate::error::{Result, WorkbenchError};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// CSV loader with header and schema-inference settings
#[derive(Debug, Clone)]
pub struct CsvLoader {
    infer_schema_length: Option<usize>,
    separator: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(1000),
            separator: b',',
        }
    }

    /// Rows scanned to infer column types; `None` scans the whole file
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    fn options(&self) -> CsvReadOptions {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(CsvParseOptions::default().with_separator(self.separator))
    }

    /// Parse an in-memory CSV document, such as an HTTP upload
    pub fn load_bytes(&self, data: &[u8]) -> Result<DataFrame> {
        if data.is_empty() {
            return Err(WorkbenchError::DataError("uploaded file is empty".to_string()));
        }
        let df = self
            .options()
            .into_reader_with_file_handle(Cursor::new(data))
            .finish()?;
        debug!(rows = df.height(), columns = df.width(), "Parsed CSV bytes");
        Ok(df)
    }

    pub fn load_path(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        let df = self.options().into_reader_with_file_handle(file).finish()?;
        debug!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded CSV file");
        Ok(df)
    }
}

/// Parse CSV bytes with the default loader
pub fn read_csv_bytes(data: &[u8]) -> Result<DataFrame> {
    CsvLoader::new().load_bytes(data)
}

/// Read a CSV file with the default loader
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<DataFrame> {
    CsvLoader::new().load_path(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes_with_missing_cell() {
        let csv = b"a,b,y\n1.0,2.0,3.0\n,4.0,5.0\n3.0,6.0,7.0\n";
        let df = read_csv_bytes(csv).unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column("a").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_empty_bytes() {
        assert!(matches!(read_csv_bytes(b""), Err(WorkbenchError::DataError(_))));
    }

    #[test]
    fn test_read_path_and_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "x;y\n1;2\n3;4\n").unwrap();

        let df = CsvLoader::new().with_separator(b';').load_path(&path).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_csv_path("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, WorkbenchError::IoError(_)));
    }
}
