//! Trapezoidal cumulative integration of a load shape.

use super::error::{ClusterError, Result};

/// Integrates a load shape into its cumulative-energy sequence.
///
/// Element `k` of the output is the trapezoidal-rule area under `series`
/// from sample 0 to sample `k + 1`. The leading zero of the running
/// integral is dropped, so the output is one element shorter than the
/// input and a single-sample series yields an empty sequence.
///
/// # Arguments
///
/// * `series` - Power readings at uniform spacing
/// * `dx` - Spacing between readings in hours (0.25 for 15-minute data)
///
/// # Errors
///
/// Returns `ClusterError::InvalidInput` if `series` is empty or `dx` is not
/// a finite positive number.
///
/// # Examples
///
/// ```
/// use loadshape_cluster::cluster::integrate::integrate;
///
/// let energy = integrate(&[1.0, 1.0, 1.0, 1.0], 0.5).unwrap();
/// assert_eq!(energy, vec![0.5, 1.0, 1.5]);
/// ```
pub fn integrate(series: &[f64], dx: f64) -> Result<Vec<f64>> {
    if series.is_empty() {
        return Err(ClusterError::invalid_input("cannot integrate an empty series"));
    }
    if !dx.is_finite() || dx <= 0.0 {
        return Err(ClusterError::invalid_input(format!(
            "sample spacing must be finite and > 0, got {dx}"
        )));
    }

    let mut total = 0.0;
    Ok(series
        .windows(2)
        .map(|pair| {
            total += dx * (pair[0] + pair[1]) / 2.0;
            total
        })
        .collect())
}
