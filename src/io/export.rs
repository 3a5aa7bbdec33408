//! CSV export of cluster assignments.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::cluster::labels::{LabelOrder, TwoStageAssignment};

/// Column header for assignment export.
const HEADER: [&str; 5] = ["row", "id", "consumption_cluster", "peaktime_cluster", "label"];

/// Exports assignments to a CSV file at the given path.
///
/// # Arguments
///
/// * `assignment` - Finished two-stage assignment
/// * `ids` - Load identifiers indexed by batch row
/// * `order` - Row order of the output
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_assignments(
    assignment: &TwoStageAssignment,
    ids: &[String],
    order: LabelOrder,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_assignments(assignment, ids, order, buf)
}

/// Writes assignments as CSV to any writer.
///
/// Rows without an entry in `ids` get an empty id.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_assignments(
    assignment: &TwoStageAssignment,
    ids: &[String],
    order: LabelOrder,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for a in assignment.ordered(order) {
        wtr.write_record(&[
            a.index.to_string(),
            ids.get(a.index).cloned().unwrap_or_default(),
            a.consumption.to_string(),
            a.peaktime.to_string(),
            a.label.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
