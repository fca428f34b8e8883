//! Response assembly shared by the local and remote read paths.

use crate::error::AppError;
use crate::models::Record;

/// Serializes records into the boundary's JSON array.
///
/// Order is preserved as received. Each element is `{"id": ..., "name": ...}`.
///
/// # Errors
///
/// Returns `AppError::SerializationError` if a record with a blank id reaches
/// this point. Upstream components never produce one, so this indicates a
/// broken invariant rather than bad input.
///
/// # Examples
///
/// ```
/// use bankbridge_core::{assemble, Record};
///
/// let records = vec![Record::new("5678", "Credit Sweets").unwrap()];
/// let body = assemble(&records).unwrap();
/// assert_eq!(body, br#"[{"id":"5678","name":"Credit Sweets"}]"#);
/// ```
pub fn assemble(records: &[Record]) -> Result<Vec<u8>, AppError> {
    if let Some(position) = records.iter().position(|r| !r.is_valid()) {
        let reason = format!("record at position {} has an empty id", position);
        return Err(AppError::SerializationError(
            <serde_json::Error as serde::ser::Error>::custom(reason),
        ));
    }

    Ok(serde_json::to_vec(records)?)
}
