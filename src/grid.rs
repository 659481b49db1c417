//! Grid validator: confirm that independently-fetched per-body series share
//! an identical time grid.

use crate::constants::{JulianDate, JD_TOLERANCE};
use crate::ephemerist_errors::EphemeristError;
use crate::series::Series;

/// Check a candidate series against a reference time grid.
///
/// Fails with [`EphemeristError::GridMismatch`] naming the offending body on
/// the first violation. A mismatch indicates a service-side inconsistency or
/// a logic defect, so the caller treats it as fatal; a multi-body dataset is
/// meaningless with misaligned grids.
pub fn validate_grid(
    reference: &[JulianDate],
    candidate: &Series,
    body: &str,
) -> Result<(), EphemeristError> {
    if candidate.t_jd.len() != reference.len() {
        return Err(EphemeristError::GridMismatch {
            body: body.to_string(),
            detail: format!(
                "{} samples, reference has {}",
                candidate.t_jd.len(),
                reference.len()
            ),
        });
    }
    for (i, (t, r)) in candidate.t_jd.iter().zip(reference).enumerate() {
        if (t - r).abs() > JD_TOLERANCE {
            return Err(EphemeristError::GridMismatch {
                body: body.to_string(),
                detail: format!("sample {i}: JD {t} vs reference {r}"),
            });
        }
    }
    Ok(())
}
