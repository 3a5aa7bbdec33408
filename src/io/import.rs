//! CSV import of load profiles, one load per record.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::cluster::error::ClusterError;
use crate::config::InputConfig;
use crate::profile::LoadBatch;

/// Errors raised while reading a load batch.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The CSV stream could not be read.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A reading could not be parsed as a number.
    #[error("record {record}, column {column}: \"{value}\" is not a number")]
    Parse {
        /// Zero-based data record index.
        record: usize,
        /// Zero-based column index.
        column: usize,
        /// Offending cell content.
        value: String,
    },

    /// The parsed rows do not form a valid load batch.
    #[error(transparent)]
    Batch(#[from] ClusterError),
}

/// A load batch together with one identifier per load.
#[derive(Debug, Clone)]
pub struct ImportedBatch {
    /// Load identifiers; the record index when the input has no id column.
    pub ids: Vec<String>,
    /// Validated profiles.
    pub batch: LoadBatch,
}

/// Reads a load batch from any CSV source.
///
/// # Errors
///
/// Returns an `ImportError` on I/O or CSV failure, on unparsable readings,
/// and when the rows fail [`LoadBatch::new`] validation.
pub fn read_batch<R: Read>(reader: R, input: &InputConfig) -> Result<ImportedBatch, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(input.has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ids = Vec::new();
    let mut rows = Vec::new();
    for (record_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let mut fields = record.iter().enumerate();

        let id = if input.id_column {
            fields.next().map(|(_, v)| v.to_string()).unwrap_or_default()
        } else {
            record_idx.to_string()
        };

        let row = fields
            .map(|(column, value)| {
                value.parse::<f64>().map_err(|_| ImportError::Parse {
                    record: record_idx,
                    column,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        ids.push(id);
        rows.push(row);
    }

    Ok(ImportedBatch {
        ids,
        batch: LoadBatch::new(rows)?,
    })
}

/// Reads a load batch from a CSV file.
///
/// # Errors
///
/// See [`read_batch`]; file-open failures surface as `ImportError::Csv`.
pub fn read_batch_from_path(path: &Path, input: &InputConfig) -> Result<ImportedBatch, ImportError> {
    let file = File::open(path).map_err(csv::Error::from)?;
    read_batch(file, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_rows() {
        let data = "1,2,3,4\n0.5,0.5,0.5,0.5\n";
        let imported = read_batch(data.as_bytes(), &InputConfig::default()).unwrap();
        assert_eq!(imported.batch.len(), 2);
        assert_eq!(imported.batch.row(0), Some(&[1.0, 2.0, 3.0, 4.0][..]));
        assert_eq!(imported.ids, vec!["0", "1"]);
    }

    #[test]
    fn reads_headers_and_ids() {
        let data = "meter,h0,h1\nA, 1.0, 2.0\nB, 3.0, 4.0\n";
        let input = InputConfig {
            has_headers: true,
            id_column: true,
        };
        let imported = read_batch(data.as_bytes(), &input).unwrap();
        assert_eq!(imported.ids, vec!["A", "B"]);
        assert_eq!(imported.batch.steps_per_day(), 2);
    }

    #[test]
    fn unparsable_cell_reports_position() {
        let data = "1,2\n3,x\n";
        let err = read_batch(data.as_bytes(), &InputConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Parse {
                record: 1,
                column: 1,
                ..
            }
        ));
    }

    #[test]
    fn ragged_rows_fail_batch_validation() {
        let data = "1,2,3\n1,2\n";
        let err = read_batch(data.as_bytes(), &InputConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::Batch(ClusterError::InvalidInput { .. })));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/loads.csv");
        assert!(read_batch_from_path(path, &InputConfig::default()).is_err());
    }
}
