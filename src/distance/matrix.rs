//! Dense cost matrix.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::models::Stop;

/// A dense n×n table of `(distance, duration)` pairs stored in row-major order.
///
/// Every entry is finite and non-negative, and every off-diagonal distance is
/// strictly positive: the construction heuristic divides by distance and the
/// strategies divide by solution cost, so a zero would be a degenerate input.
///
/// # Examples
///
/// ```
/// use u_colony::models::Stop;
/// use u_colony::distance::CostMatrix;
///
/// let stops = vec![
///     Stop::depot(0.0, 0.0),
///     Stop::new(1, 3.0, 4.0, 10, 5.0),
///     Stop::new(2, 6.0, 8.0, 20, 5.0),
/// ];
/// let cm = CostMatrix::from_stops(&stops, 1.0).unwrap();
/// assert!((cm.distance(0, 1) - 5.0).abs() < 1e-10);
/// assert!((cm.duration(1, 2) - 5.0).abs() < 1e-10);
/// assert_eq!(cm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMatrix {
    size: usize,
    distances: Vec<f64>,
    durations: Vec<f64>,
}

impl CostMatrix {
    /// Creates a cost matrix from explicit row-major distance and duration grids.
    ///
    /// Fails if either grid is not `size * size` long or holds an unusable entry.
    pub fn from_data(
        size: usize,
        distances: Vec<f64>,
        durations: Vec<f64>,
    ) -> Result<Self, ProviderError> {
        let expected = size * size;
        for grid in [&distances, &durations] {
            if grid.len() != expected {
                return Err(ProviderError::SizeMismatch {
                    expected,
                    actual: grid.len(),
                });
            }
        }
        let matrix = Self {
            size,
            distances,
            durations,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Creates a cost matrix where duration equals distance (unit speed).
    pub fn from_distances(size: usize, distances: Vec<f64>) -> Result<Self, ProviderError> {
        let durations = distances.clone();
        Self::from_data(size, distances, durations)
    }

    /// Computes straight-line distances from stop coordinates.
    ///
    /// Durations are `distance / speed`.
    pub fn from_stops(stops: &[Stop], speed: f64) -> Result<Self, ProviderError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ProviderError::InvalidSpeed(speed));
        }
        let n = stops.len();
        let mut distances = vec![0.0; n * n];
        let mut durations = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = stops[i].distance_to(&stops[j]);
                for (a, b) in [(i, j), (j, i)] {
                    distances[a * n + b] = d;
                    durations[a * n + b] = d / speed;
                }
            }
        }
        Self::from_data(n, distances, durations)
    }

    fn validate(&self) -> Result<(), ProviderError> {
        let n = self.size;
        for from in 0..n {
            for to in 0..n {
                let d = self.distance(from, to);
                let t = self.duration(from, to);
                let reason = if !d.is_finite() || !t.is_finite() {
                    Some("value is not finite")
                } else if d < 0.0 || t < 0.0 {
                    Some("value is negative")
                } else if from != to && d == 0.0 {
                    Some("distance between distinct stops must be positive")
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(ProviderError::Malformed {
                        from,
                        to,
                        reason: reason.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Travel distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.size + to]
    }

    /// Travel duration from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn duration(&self, from: usize, to: usize) -> f64 {
        self.durations[from * self.size + to]
    }

    /// Number of stops (including the depot) covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if both grids are symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.distance(i, j) - self.distance(j, i)).abs() > tol
                    || (self.duration(i, j) - self.duration(j, i)).abs() > tol
                {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stops() -> Vec<Stop> {
        vec![
            Stop::depot(0.0, 0.0),
            Stop::new(1, 3.0, 4.0, 10, 5.0),
            Stop::new(2, 0.0, 8.0, 20, 5.0),
        ]
    }

    #[test]
    fn test_from_stops() {
        let cm = CostMatrix::from_stops(&sample_stops(), 2.0).expect("valid");
        assert_eq!(cm.size(), 3);
        assert!((cm.distance(0, 1) - 5.0).abs() < 1e-10);
        assert!((cm.distance(0, 2) - 8.0).abs() < 1e-10);
        assert!((cm.duration(0, 2) - 4.0).abs() < 1e-10);
        assert_eq!(cm.distance(1, 1), 0.0);
        assert!(cm.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_stops_rejects_bad_speed() {
        for bad in [0.0, -2.0, f64::INFINITY] {
            assert_eq!(
                CostMatrix::from_stops(&sample_stops(), bad).unwrap_err(),
                ProviderError::InvalidSpeed(bad)
            );
        }
        let err = CostMatrix::from_stops(&sample_stops(), f64::NAN).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidSpeed(v) if v.is_nan()));
    }

    #[test]
    fn test_from_data_size_mismatch() {
        let err = CostMatrix::from_distances(2, vec![0.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ProviderError::SizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_negative_entry_is_malformed() {
        let err = CostMatrix::from_distances(2, vec![0.0, -1.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_nan_entry_is_malformed() {
        let err = CostMatrix::from_data(2, vec![0.0, 1.0, 1.0, 0.0], vec![0.0, f64::NAN, 1.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_zero_off_diagonal_distance_is_malformed() {
        let err = CostMatrix::from_distances(2, vec![0.0, 0.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_asymmetric_matrix() {
        let cm = CostMatrix::from_distances(2, vec![0.0, 10.0, 15.0, 0.0]).expect("valid");
        assert!(!cm.is_symmetric(1e-10));
        assert_eq!(cm.distance(1, 0), 15.0);
    }
}
