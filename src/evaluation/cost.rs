//! Route cost model.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Route;

/// Blend of distance, elapsed time and a per-vehicle fixed charge.
///
/// The default charges distance only, which matches the usual reading of
/// "total route length" as the objective.
///
/// # Examples
///
/// ```
/// use u_colony::evaluation::CostModel;
///
/// let model = CostModel::default()
///     .with_duration_weight(0.5)
///     .with_fixed_vehicle_cost(100.0);
/// assert_eq!(model.distance_weight, 1.0);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Weight per unit of travelled distance.
    pub distance_weight: f64,
    /// Weight per unit of route duration (travel, waiting and service).
    pub duration_weight: f64,
    /// Charge for every vehicle that leaves the depot.
    pub fixed_vehicle_cost: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            distance_weight: 1.0,
            duration_weight: 0.0,
            fixed_vehicle_cost: 0.0,
        }
    }
}

impl CostModel {
    /// Sets the distance weight.
    pub fn with_distance_weight(mut self, w: f64) -> Self {
        self.distance_weight = w;
        self
    }

    /// Sets the duration weight.
    pub fn with_duration_weight(mut self, w: f64) -> Self {
        self.duration_weight = w;
        self
    }

    /// Sets the fixed cost per used vehicle.
    pub fn with_fixed_vehicle_cost(mut self, c: f64) -> Self {
        self.fixed_vehicle_cost = c;
        self
    }

    /// Checks that all weights are finite and non-negative and that the
    /// blend can never price a non-empty route at zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("distance_weight", self.distance_weight),
            ("duration_weight", self.duration_weight),
            ("fixed_vehicle_cost", self.fixed_vehicle_cost),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, "must be finite and >= 0"));
            }
        }
        if self.distance_weight == 0.0 && self.fixed_vehicle_cost == 0.0 {
            return Err(ConfigError::invalid(
                "distance_weight",
                "must be > 0 unless a fixed vehicle cost is charged",
            ));
        }
        Ok(())
    }

    /// Cost of one route; empty routes cost nothing.
    pub fn route_cost(&self, route: &Route) -> f64 {
        if route.is_empty() {
            return 0.0;
        }
        self.distance_weight * route.total_distance()
            + self.duration_weight * route.total_duration()
            + self.fixed_vehicle_cost
    }

    /// Sum of [`route_cost`](Self::route_cost) over `routes`, in order.
    pub fn routes_cost(&self, routes: &[Route]) -> f64 {
        routes.iter().map(|r| self.route_cost(r)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fleet, Visit};

    fn route(distance: f64, duration: f64) -> Route {
        let fleet = Fleet::homogeneous(10, 1).expect("valid");
        let mut r = Route::new(&fleet.vehicles()[0], 0.0);
        r.push_visit(Visit {
            stop_id: 1,
            arrival_time: 1.0,
            service_start: 1.0,
            departure_time: 1.0,
            load_after: 1,
        });
        r.close(distance, duration);
        r
    }

    #[test]
    fn test_default_is_distance_only() {
        let model = CostModel::default();
        assert_eq!(model.route_cost(&route(12.0, 30.0)), 12.0);
    }

    #[test]
    fn test_blend_and_fixed_cost() {
        let model = CostModel::default()
            .with_duration_weight(0.5)
            .with_fixed_vehicle_cost(100.0);
        assert!((model.route_cost(&route(12.0, 30.0)) - 127.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_route_is_free() {
        let fleet = Fleet::homogeneous(10, 1).expect("valid");
        let r = Route::new(&fleet.vehicles()[0], 0.0);
        let model = CostModel::default().with_fixed_vehicle_cost(100.0);
        assert_eq!(model.route_cost(&r), 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(CostModel::default().validate().is_ok());
        let err = CostModel::default()
            .with_duration_weight(-1.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "duration_weight");
        let err = CostModel::default()
            .with_distance_weight(0.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.field(), "distance_weight");
    }
}
