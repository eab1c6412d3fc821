//! Small numeric and csv helpers.
use crate::errors;
use serde::Serialize;

/// Calculate the mean of a slice of f64 values.
///  - `numbers` is a reference to a slice of f64 values.
///  - Returns the mean of `numbers`.
///
/// # Examples
///
/// ```rust
/// let numbers = vec![0.1, 0.2, 0.3];
/// let mn = watbal::utils::mean(&numbers);
/// assert!((mn - 0.2).abs() < 1e-12);
/// ```
pub fn mean(numbers: &[f64]) -> f64 {
    let sum: f64 = numbers.iter().sum();

    sum / numbers.len() as f64
}

/// Calculate the weighted mean of a slice of f64 values.
///  - `numbers` and `weights` are slices of equal length.
///  - Returns the mean of `numbers` weighted by `weights`.
///
/// # Examples
///
/// ```rust
/// let mn = watbal::utils::weighted_mean(&[1.0, 3.0], &[3.0, 1.0]);
/// assert!((mn - 1.5).abs() < 1e-12);
/// ```
pub fn weighted_mean(numbers: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    let dot: f64 = numbers.iter().zip(weights.iter()).map(|(n, w)| n * w).sum();
    dot / total
}

/// Write serializable results to a csv file.
pub fn record<T: Serialize>(rec: &mut Vec<T>, path: &str) -> Result<(), errors::WbError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for i in rec {
        wtr.serialize(i)?;
    }
    wtr.flush()?;
    Ok(())
}
