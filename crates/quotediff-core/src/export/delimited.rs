use crate::error::QuoteDiffError;
use crate::export::Tabular;

/// Write records as CSV with a header row.
pub fn to_csv<T: Tabular>(records: &[T]) -> Result<Vec<u8>, QuoteDiffError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::headers())?;
    for record in records {
        writer.write_record(record.cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| QuoteDiffError::Export(format!("failed to flush CSV: {e}")))
}
