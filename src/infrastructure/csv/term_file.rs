//! Headerless two-column CSV ingestion: first column is the term, second
//! is its category. Row order is preserved and no dedup is applied.

use crate::domain::entities::term_record::TermRecord;
use crate::domain::error::DomainError;
use std::io::Read;
use std::path::Path;

/// Read term records from a CSV file. `limit` > 0 caps the number of rows
/// (test mode); 0 reads everything.
pub fn read_term_file(path: &Path, limit: usize) -> Result<Vec<TermRecord>, DomainError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DomainError::Csv(format!("Failed to open {}: {e}", path.display())))?;
    let records = read_term_records(file, limit)?;
    if limit > 0 {
        tracing::info!(rows = records.len(), limit, "Test mode: capped CSV rows");
    } else {
        tracing::info!(rows = records.len(), path = %path.display(), "Read CSV file");
    }
    Ok(records)
}

/// Read term records from any reader (file or uploaded bytes).
pub fn read_term_records<R: Read>(reader: R, limit: usize) -> Result<Vec<TermRecord>, DomainError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, row) in csv_reader.records().enumerate() {
        if limit > 0 && records.len() >= limit {
            break;
        }
        let row = row.map_err(|e| DomainError::Csv(format!("Row {}: {e}", line + 1)))?;
        if row.len() < 2 {
            return Err(DomainError::Csv(format!(
                "Row {}: expected 2 columns (term, category), got {}",
                line + 1,
                row.len()
            )));
        }
        let record = TermRecord::new(row[0].to_string(), row[1].to_string())
            .map_err(|e| DomainError::InvalidInput(format!("Row {}: {e}", line + 1)))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_two_columns_in_order() {
        let data = "call option,derivatives\nbond yield,fixed income\n";
        let records = read_term_records(data.as_bytes(), 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].term, "call option");
        assert_eq!(records[0].category, "derivatives");
        assert_eq!(records[1].term, "bond yield");
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let data = "\"mergers, acquisitions\",corporate finance\n";
        let records = read_term_records(data.as_bytes(), 0).unwrap();
        assert_eq!(records[0].term, "mergers, acquisitions");
    }

    #[test]
    fn limit_caps_rows() {
        let data = "a,x\nb,x\nc,x\n";
        let records = read_term_records(data.as_bytes(), 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].term, "b");
    }

    #[test]
    fn single_column_row_is_an_error() {
        let data = "a,x\nlonely\n";
        assert!(matches!(
            read_term_records(data.as_bytes(), 0),
            Err(DomainError::Csv(_))
        ));
    }
}
