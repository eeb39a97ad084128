//! CSV Data Loader Module
//! Decodes legacy-encoded CSV byte streams and parses them with Polars.

use encoding_rs::WINDOWS_1251;
use polars::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Input is not valid windows-1251 text")]
    Encoding,
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Loads sick-leave CSV exports.
///
/// The source files come from a legacy export tool: windows-1251 encoded,
/// single-quote quoting, Cyrillic headers. The byte stream is decoded to
/// UTF-8 before Polars sees it.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file from disk.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        let bytes = std::fs::read(file_path)?;
        self.file_path = Some(PathBuf::from(file_path));
        self.load_bytes(&bytes)
    }

    /// Load a raw CSV byte stream.
    ///
    /// Malformed byte sequences fail the whole file; there is no partial
    /// recovery, the dataset is small and meant for single-file analysis.
    pub fn load_bytes(&mut self, raw: &[u8]) -> Result<&DataFrame, LoaderError> {
        let (text, _, had_errors) = WINDOWS_1251.decode(raw);
        if had_errors {
            return Err(LoaderError::Encoding);
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'\'')))
            .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
            .finish()?;

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
