//! Cost matrix providers.

use tracing::debug;

use crate::error::ProviderError;
use crate::models::Stop;

use super::CostMatrix;

/// Supplies the `(distance, duration)` matrix for an ordered stop list.
///
/// Implementations typically wrap a road-network routing service. A failure
/// aborts the run; retries, if any, are the provider's business.
///
/// # Examples
///
/// ```
/// use u_colony::distance::{CostMatrix, CostProvider};
/// use u_colony::error::ProviderError;
/// use u_colony::models::Stop;
///
/// struct Offline;
///
/// impl CostProvider for Offline {
///     fn get_costs(&self, _stops: &[Stop]) -> Result<CostMatrix, ProviderError> {
///         Err(ProviderError::Unreachable("no network".into()))
///     }
/// }
///
/// assert!(Offline.get_costs(&[Stop::depot(0.0, 0.0)]).is_err());
/// ```
pub trait CostProvider: Send + Sync {
    /// Returns the cost matrix for `stops`, indexed by stop position.
    fn get_costs(&self, stops: &[Stop]) -> Result<CostMatrix, ProviderError>;
}

/// Straight-line distances between stop coordinates at a constant speed.
///
/// # Examples
///
/// ```
/// use u_colony::distance::{CostProvider, EuclideanProvider};
/// use u_colony::models::Stop;
///
/// let stops = vec![Stop::depot(0.0, 0.0), Stop::new(1, 6.0, 8.0, 1, 0.0)];
/// let costs = EuclideanProvider::new(2.0).get_costs(&stops).unwrap();
/// assert!((costs.distance(0, 1) - 10.0).abs() < 1e-10);
/// assert!((costs.duration(0, 1) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuclideanProvider {
    speed: f64,
}

impl EuclideanProvider {
    /// Creates a provider travelling `speed` distance units per time unit.
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }
}

impl Default for EuclideanProvider {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CostProvider for EuclideanProvider {
    fn get_costs(&self, stops: &[Stop]) -> Result<CostMatrix, ProviderError> {
        debug!(stops = stops.len(), speed = self.speed, "computing euclidean costs");
        CostMatrix::from_stops(stops, self.speed)
    }
}

/// A matrix fetched ahead of time, e.g. from an external routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticProvider {
    matrix: CostMatrix,
}

impl StaticProvider {
    /// Wraps an already validated matrix.
    pub fn new(matrix: CostMatrix) -> Self {
        Self { matrix }
    }
}

impl CostProvider for StaticProvider {
    fn get_costs(&self, stops: &[Stop]) -> Result<CostMatrix, ProviderError> {
        if self.matrix.size() != stops.len() {
            return Err(ProviderError::SizeMismatch {
                expected: stops.len() * stops.len(),
                actual: self.matrix.size() * self.matrix.size(),
            });
        }
        Ok(self.matrix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<Stop> {
        vec![
            Stop::depot(0.0, 0.0),
            Stop::new(1, 1.0, 0.0, 1, 0.0),
            Stop::new(2, 2.0, 0.0, 1, 0.0),
        ]
    }

    #[test]
    fn test_euclidean_provider() {
        let costs = EuclideanProvider::default().get_costs(&stops()).expect("valid");
        assert_eq!(costs.size(), 3);
        assert!((costs.distance(0, 2) - 2.0).abs() < 1e-10);
        assert!((costs.duration(2, 1) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_euclidean_provider_duplicate_coordinates() {
        let stops = vec![Stop::depot(0.0, 0.0), Stop::new(1, 0.0, 0.0, 1, 0.0)];
        let err = EuclideanProvider::default().get_costs(&stops).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[test]
    fn test_euclidean_provider_rejects_zero_speed() {
        let stops = vec![Stop::depot(0.0, 0.0), Stop::new(1, 1.0, 0.0, 1, 0.0)];
        let err = EuclideanProvider::new(0.0).get_costs(&stops).unwrap_err();
        assert_eq!(err, ProviderError::InvalidSpeed(0.0));
        assert!(!matches!(err, ProviderError::Unreachable(_)));
    }

    #[test]
    fn test_static_provider_size_check() {
        let matrix = CostMatrix::from_distances(2, vec![0.0, 1.0, 1.0, 0.0]).expect("valid");
        let provider = StaticProvider::new(matrix);
        assert!(provider.get_costs(&stops()[..2]).is_ok());
        assert!(matches!(
            provider.get_costs(&stops()),
            Err(ProviderError::SizeMismatch { expected: 9, actual: 4 })
        ));
    }
}
