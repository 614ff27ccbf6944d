//! File-based tabular store: header + cell tables read from CSV or Parquet.
//!
//! Cells are kept as optional strings; typing happens in `dataset`, so a bad
//! cell becomes a null measurement instead of a failed load.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;

use crate::error::{Error, Result};

const NULL_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "None"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabularSource {
    Csv(PathBuf),
    Parquet(PathBuf),
}

impl TabularSource {
    /// Pick the reader from the file extension; anything but `.parquet` is CSV.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
        if is_parquet {
            TabularSource::Parquet(path)
        } else {
            TabularSource::Csv(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TabularSource::Csv(path) | TabularSource::Parquet(path) => path,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    pub fn read(source: &TabularSource) -> Result<Self> {
        match source {
            TabularSource::Csv(path) => {
                let file = fs::File::open(path).map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::from_csv_reader(file).map_err(|source| Error::Csv {
                    path: path.clone(),
                    source,
                })
            }
            TabularSource::Parquet(path) => read_parquet(path),
        }
    }

    pub fn from_csv_reader<R: Read>(rdr: R) -> std::result::Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<Option<String>> = record.iter().map(null_if_blank).collect();
            row.resize(headers.len(), None);
            rows.push(row);
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve every named column, or fail with the full list of missing ones.
    pub fn require_columns(&self, dataset: &'static str, names: &[&str]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(Error::Schema { dataset, missing })
        }
    }
}

fn null_if_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NULL_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_parquet(path: &Path) -> Result<RawTable> {
    let wrap = |source: parquet::errors::ParquetError| Error::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = SerializedFileReader::new(file).map_err(wrap)?;

    let headers: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let by_name: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let mut rows = Vec::new();
    for row in reader.get_row_iter(None).map_err(wrap)? {
        let row = row.map_err(wrap)?;
        let mut cells = vec![None; headers.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(&idx) = by_name.get(name.as_str()) {
                cells[idx] = field_to_cell(field);
            }
        }
        rows.push(cells);
    }

    Ok(RawTable::new(headers, rows))
}

fn field_to_cell(field: &Field) -> Option<String> {
    match field {
        Field::Null => None,
        Field::Str(s) => null_if_blank(s),
        Field::Bytes(b) => b.as_utf8().ok().and_then(null_if_blank),
        other => null_if_blank(&other.to_string()),
    }
}
