//! CSV chart reader
//!
//! The header row supplies the column names. Cells are kept as raw strings
//! (blank cells become null) and converted lazily by the consumers.

use crate::reader::{IoError, IoResult, TableReader};
use crate::schema::{ColumnSpec, Row, TabularData};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV file reader
pub struct CsvReader {
    path: Option<String>,
    table: TabularData,
    metadata: HashMap<String, String>,
}

impl CsvReader {
    /// Open a comma-separated file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file
    pub fn open_with_delimiter(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let mut reader = Self::from_reader(BufReader::new(file), delimiter)?;
        reader.path = Some(path.to_string());
        Ok(reader)
    }

    /// Read delimited text from any source
    pub fn from_reader<R: Read>(source: R, delimiter: u8) -> IoResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.trim().to_string()).collect();
        if headers.is_empty() {
            return Err(IoError::InvalidFormat("missing header row".to_string()));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let cell = match record.get(i).map(str::trim) {
                        Some(s) if !s.is_empty() => Value::String(s.to_string()),
                        _ => Value::Null,
                    };
                    (name.clone(), cell)
                })
                .collect();
            rows.push(row);
        }

        let columns = headers.into_iter().map(ColumnSpec::new).collect();
        let table = TabularData::new(columns, rows);
        table.validate()?;

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "CSV".to_string());
        metadata.insert("delimiter".to_string(), (delimiter as char).to_string());
        metadata.insert("rows".to_string(), table.num_rows().to_string());

        Ok(Self {
            path: None,
            table,
            metadata,
        })
    }
}

impl TableReader for CsvReader {
    fn read_table(&self) -> IoResult<TabularData> {
        Ok(self.table.clone())
    }

    fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_from_reader() {
        let text = "Year,Revenue,Margin\n2019,\"1,200\",12%\n2020,,9.5%\n";
        let reader = CsvReader::from_reader(text.as_bytes(), b',').unwrap();
        let table = reader.read_table().unwrap();

        assert_eq!(table.series_names(), vec!["Revenue", "Margin"]);
        assert_eq!(table.value(1, "Revenue"), Some(&json!(null)));
        assert_eq!(table.series_values("Revenue"), vec![1200.0]);
        assert_eq!(table.series_values("Margin"), vec![12.0, 9.5]);
    }

    #[test]
    fn test_short_records_fill_null() {
        let text = "x,a,b\n1,2\n";
        let table = CsvReader::from_reader(text.as_bytes(), b',')
            .unwrap()
            .read_table()
            .unwrap();
        assert_eq!(table.value(0, "b"), Some(&json!(null)));
    }

    #[test]
    fn test_open_tsv() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        file.write_all(b"Month\tRain\nJan\t3.2\nFeb\t4.1\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let reader = crate::reader::open_file(&path).unwrap();
        assert_eq!(reader.format_name(), "CSV");
        let table = reader.read_table().unwrap();
        assert_eq!(table.series_values("Rain"), vec![3.2, 4.1]);
    }
}
