//! CSV loader for transaction exports.
//!
//! The export is a Latin-1 (ISO-8859-1) encoded CSV whose first row holds the
//! column names. Only the description and quantity columns are read:
//! ```csv
//! InvoiceNo,StockCode,Description,Quantity,UnitPrice
//! 536365,85123A,WHITE HANGING HEART T-LIGHT HOLDER,6,2.55
//! C536379,D,Discount,-1,27.50
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, SentixError};

/// Where and how to read the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the CSV file.
    pub path: PathBuf,
    /// Header of the free-text column.
    pub description_column: String,
    /// Header of the integer quantity column.
    pub quantity_column: String,
    /// Field delimiter.
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            path: PathBuf::from("dataset/data.csv"),
            description_column: "Description".to_string(),
            quantity_column: "Quantity".to_string(),
            delimiter: ',',
        }
    }
}

/// Reads a transaction CSV into a [`Dataset`].
#[derive(Debug, Clone)]
pub struct CsvLoader {
    description_column: String,
    quantity_column: String,
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Loader for the default `Description` / `Quantity` columns.
    pub fn new() -> Self {
        let config = DataConfig::default();
        CsvLoader {
            description_column: config.description_column,
            quantity_column: config.quantity_column,
            delimiter: b',',
        }
    }

    /// Loader using the column names and delimiter from `config`.
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        Ok(CsvLoader {
            description_column: config.description_column.clone(),
            quantity_column: config.quantity_column.clone(),
            delimiter: ascii_delimiter(config.delimiter)?,
        })
    }

    /// Set a custom delimiter character. Only ASCII delimiters are supported.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        self.delimiter = ascii_delimiter(delimiter)?;
        Ok(self)
    }

    /// Load and label the dataset at `path`.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SentixError::input(format!(
                "dataset file not found: {}",
                path.display()
            )));
        }

        info!("Loading dataset from {}", path.display());
        let file = File::open(path)?;
        let rows = self.read_rows(file)?;
        let dataset = Dataset::from_rows(rows)?;

        info!("Loaded {} labeled records", dataset.len());
        for (label, count) in dataset.label_counts() {
            debug!("  {label}: {count}");
        }

        Ok(dataset)
    }

    /// Read `(description, quantity)` pairs from any reader.
    pub fn read_rows<R: std::io::Read>(&self, input: R) -> Result<Vec<(String, i64)>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader.byte_headers()?.iter().map(decode_latin1).collect();
        let description_idx = self.column_index(&headers, &self.description_column)?;
        let quantity_idx = self.column_index(&headers, &self.quantity_column)?;

        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let description = record.get(description_idx).map(decode_latin1).unwrap_or_default();
            let raw_quantity = record.get(quantity_idx).map(decode_latin1).unwrap_or_default();
            let quantity = parse_quantity(&raw_quantity).ok_or_else(|| {
                SentixError::input(format!(
                    "line {line}: invalid {} value {raw_quantity:?}",
                    self.quantity_column
                ))
            })?;
            rows.push((description, quantity));
        }

        debug!("Read {} rows", rows.len());
        Ok(rows)
    }

    fn column_index(&self, headers: &[String], name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                SentixError::input(format!(
                    "missing required column `{name}` (found: {})",
                    headers.join(", ")
                ))
            })
    }
}

fn ascii_delimiter(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(SentixError::input(format!(
            "delimiter {delimiter:?} is not an ASCII character"
        )))
    }
}

/// Load the dataset described by `config`.
pub fn load_dataset(config: &DataConfig) -> Result<Dataset> {
    CsvLoader::from_config(config)?.load(&config.path)
}

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of equal value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parse an integer quantity, accepting integral floats such as `12.0`.
fn parse_quantity(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(q) = value.parse::<i64>() {
        return Some(q);
    }
    let q = value.parse::<f64>().ok()?;
    if q.is_finite() && q.fract() == 0.0 && q.abs() < i64::MAX as f64 {
        Some(q as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::dataset::record::Sentiment;

    #[test]
    fn test_read_rows_ignores_other_columns() {
        let csv = "InvoiceNo,Description,Quantity,UnitPrice\n1,caneca azul,12,2.5\n2,pires,-2,1.0\n";
        let rows = CsvLoader::new().read_rows(csv.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![("caneca azul".to_string(), 12), ("pires".to_string(), -2)]
        );
    }

    #[test]
    fn test_latin1_decoding() {
        let mut bytes = b"Description,Quantity\n".to_vec();
        bytes.extend_from_slice(&[b'c', b'a', b'f', 0xE9, b',', b'3', b'\n']);
        let rows = CsvLoader::new().read_rows(bytes.as_slice()).unwrap();

        assert_eq!(rows[0].0, "café");
    }

    #[test]
    fn test_missing_column() {
        let csv = "Description,Price\ncaneca,2\n";
        let err = CsvLoader::new().read_rows(csv.as_bytes()).unwrap_err();

        assert!(err.is_input_error());
        assert!(err.to_string().contains("Quantity"));
    }

    #[test]
    fn test_float_quantity() {
        assert_eq!(parse_quantity("12.0"), Some(12));
        assert_eq!(parse_quantity(" -3 "), Some(-3));
        assert_eq!(parse_quantity("1.5"), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_invalid_quantity_names_line() {
        let csv = "Description,Quantity\ncaneca,2\npires,muitos\n";
        let err = CsvLoader::new().read_rows(csv.as_bytes()).unwrap_err();

        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let err = CsvLoader::new().with_delimiter('§').unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains('§'));

        let config = DataConfig {
            delimiter: '¦',
            ..DataConfig::default()
        };
        assert!(CsvLoader::from_config(&config).is_err());

        let loader = CsvLoader::new().with_delimiter(';').unwrap();
        let rows = loader.read_rows("Description;Quantity\ncaneca;12\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_custom_columns_and_delimiter() {
        let config = DataConfig {
            description_column: "Produto".to_string(),
            quantity_column: "Qtd".to_string(),
            delimiter: ';',
            ..DataConfig::default()
        };
        let csv = "Produto;Qtd\ncaneca;20\n";
        let rows = CsvLoader::from_config(&config)
            .unwrap()
            .read_rows(csv.as_bytes())
            .unwrap();

        assert_eq!(rows, vec![("caneca".to_string(), 20)]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CsvLoader::new().load("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, SentixError::Input(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Description,Quantity").unwrap();
        writeln!(file, "ótimo produto,15").unwrap();
        writeln!(file, ",30").unwrap();
        writeln!(file, "produto pessimo,-5").unwrap();
        writeln!(file, "produto comum,3").unwrap();
        file.flush().unwrap();

        let dataset = CsvLoader::new().load(file.path()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.labels(),
            vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
        );
    }
}
