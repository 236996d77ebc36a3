//! Route and visit types.

use serde::{Deserialize, Serialize};

use super::fleet::Vehicle;

/// Index of the depot in every stop list and matrix.
pub const DEPOT: usize = 0;

/// A single visit to a stop within a route.
///
/// Tracks the stop ID along with computed timing and load state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Stop being visited.
    pub stop_id: usize,
    /// Arrival time at this stop.
    pub arrival_time: f64,
    /// Service start (arrival plus any waiting for the window to open).
    pub service_start: f64,
    /// Departure time (service start + service duration).
    pub departure_time: f64,
    /// Cumulative load after this visit.
    pub load_after: u32,
}

/// An ordered sequence of stop visits assigned to a single vehicle.
///
/// A route starts and ends at the depot; the depot is not stored in
/// `visits` but appears in [`Route::path`] and [`Route::arcs`].
///
/// # Examples
///
/// ```
/// use u_colony::models::{Fleet, Route, Visit};
///
/// let fleet = Fleet::homogeneous(10, 1).unwrap();
/// let mut route = Route::new(&fleet.vehicles()[0], 0.0);
/// route.push_visit(Visit {
///     stop_id: 1,
///     arrival_time: 4.0,
///     service_start: 4.0,
///     departure_time: 6.0,
///     load_after: 3,
/// });
/// route.close(8.0, 10.0);
/// assert_eq!(route.path(), vec![0, 1, 0]);
/// assert_eq!(route.arcs().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
/// assert_eq!(route.total_duration(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    vehicle_index: usize,
    capacity: u32,
    visits: Vec<Visit>,
    start_time: f64,
    return_time: f64,
    total_distance: f64,
    total_load: u32,
}

impl Route {
    /// Creates an empty route for the given vehicle, leaving the depot at `start_time`.
    pub fn new(vehicle: &Vehicle, start_time: f64) -> Self {
        Self {
            vehicle_index: vehicle.index,
            capacity: vehicle.capacity,
            visits: Vec::new(),
            start_time,
            return_time: start_time,
            total_distance: 0.0,
            total_load: 0,
        }
    }

    /// Appends a visit to the end of this route.
    pub fn push_visit(&mut self, visit: Visit) {
        self.total_load = visit.load_after;
        self.visits.push(visit);
    }

    /// Records the return to the depot with the route's final distance and time.
    pub fn close(&mut self, total_distance: f64, return_time: f64) {
        self.total_distance = total_distance;
        self.return_time = return_time;
    }

    /// Index of the vehicle serving this route.
    pub fn vehicle_index(&self) -> usize {
        self.vehicle_index
    }

    /// Capacity of the vehicle serving this route.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the ordered sequence of visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of stop visits (excluding depot).
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if this route has no stop visits.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Stop IDs in visit order, depot excluded.
    pub fn stop_ids(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.stop_id).collect()
    }

    /// Full path including the depot at both ends.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.visits.len() + 2);
        path.push(DEPOT);
        path.extend(self.visits.iter().map(|v| v.stop_id));
        path.push(DEPOT);
        path
    }

    /// Traversed `(from, to)` stop pairs, depot legs included.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let inner = self.visits.iter().map(|v| v.stop_id);
        std::iter::once(DEPOT)
            .chain(inner.clone())
            .zip(inner.chain(std::iter::once(DEPOT)))
            .filter(move |_| !self.visits.is_empty())
    }

    /// Departure time from the depot.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Arrival time back at the depot.
    pub fn return_time(&self) -> f64 {
        self.return_time
    }

    /// Total distance of this route.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Elapsed time from depot departure to depot return.
    pub fn total_duration(&self) -> f64 {
        self.return_time - self.start_time
    }

    /// Total load served by this route.
    pub fn total_load(&self) -> u32 {
        self.total_load
    }
}
