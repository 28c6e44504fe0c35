//! JSON chart document reader
//!
//! Accepts `{"columns": [...], "data": [{...}, ...]}`. When `columns` is
//! absent the column order is taken from the keys of the first row.

use crate::reader::{IoError, IoResult, TableReader};
use crate::schema::{ColumnSpec, TabularData};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON chart document reader
pub struct JsonReader {
    path: Option<String>,
    table: TabularData,
    metadata: HashMap<String, String>,
}

impl JsonReader {
    /// Open a JSON chart document
    pub fn open(path: &str) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let table: TabularData = serde_json::from_reader(BufReader::new(file))?;

        let mut reader = Self::from_table(table)?;
        reader.path = Some(path.to_string());
        Ok(reader)
    }

    /// Parse a JSON chart document held in memory
    pub fn from_json_str(json: &str) -> IoResult<Self> {
        let table: TabularData = serde_json::from_str(json)?;
        Self::from_table(table)
    }

    fn from_table(mut table: TabularData) -> IoResult<Self> {
        if table.columns.is_empty() {
            table.columns = infer_columns(&table);
        }
        table.validate()?;

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "JSON".to_string());
        metadata.insert("rows".to_string(), table.num_rows().to_string());

        Ok(Self {
            path: None,
            table,
            metadata,
        })
    }
}

impl TableReader for JsonReader {
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
        "JSON"
    }
}

/// Column order from the first row's keys (insertion order is preserved)
fn infer_columns(table: &TabularData) -> Vec<ColumnSpec> {
    table
        .rows
        .first()
        .map(|row| row.keys().map(ColumnSpec::new).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"{
        "columns": [{"name": "Year"}, {"name": "EV"}, {"name": "Gas"}],
        "data": [
            {"Year": 2019, "EV": 40, "Gas": 60},
            {"Year": 2020, "EV": 80, "Gas": 20}
        ]
    }"#;

    #[test]
    fn test_from_json_str() {
        let reader = JsonReader::from_json_str(DOC).unwrap();
        let table = reader.read_table().unwrap();
        assert_eq!(table.series_names(), vec!["EV", "Gas"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(reader.format_name(), "JSON");
        assert_eq!(reader.metadata().get("rows").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_infer_columns_from_first_row() {
        let reader =
            JsonReader::from_json_str(r#"{"data": [{"Month": "Jan", "Rain": "3.2"}]}"#).unwrap();
        let table = reader.read_table().unwrap();
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Month", "Rain"]);
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let doc = r#"{"columns": ["a", "a"], "data": []}"#;
        assert!(matches!(
            JsonReader::from_json_str(doc),
            Err(IoError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            JsonReader::from_json_str("{not json"),
            Err(IoError::Json(_))
        ));
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let table = crate::reader::read_table(&path).unwrap();
        assert_eq!(table.series_values("EV"), vec![40.0, 80.0]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            JsonReader::open("/nonexistent/chart.json"),
            Err(IoError::FileNotFound(_))
        ));
    }
}
