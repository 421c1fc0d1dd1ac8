use crate::error::{AppError, ErrorKind};

/// Parses a dot-notation OID string *(e.g., ".1.3.6.1.2.1.1.2.0")* into a vector
/// of numerical components. A leading dot, as used in probe catalogs, is accepted.
///
/// Returns an empty vector if the input is empty. Returns [`AppError`] with
/// [`ErrorKind::InvalidOidFormat`] if any segment cannot be parsed as a [`u64`].
pub fn parse_oid_to_vec(oid: &str) -> Result<Vec<u64>, AppError> {
    if oid.is_empty() {
        return Ok(vec![]);
    }

    oid.trim_start_matches('.')
        .split('.')
        .map(|segment| {
            segment
                .parse::<u64>()
                .map_err(|_| AppError::new(ErrorKind::InvalidOidFormat))
        })
        .collect()
}
