//! Choosing stops from a pool of candidate locations.

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Stop, TimeWindow};

use super::DEFAULT_HORIZON;

/// A candidate location, e.g. a road-network node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// External id.
    pub id: u64,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

/// Picks the stops of a problem from candidate points.
///
/// The first returned stop is the depot; the rest carry consecutive ids.
pub trait StopSelector {
    /// Returns the depot followed by the selected customer stops.
    fn select_stops(&self, points: &[RawPoint]) -> Vec<Stop>;
}

/// Uniform random sampling with random demands and time windows.
///
/// Windows open at a random minute in `window_start` and stay open for a
/// random number of minutes in `window_duration`. The depot is open all day.
///
/// # Examples
///
/// ```
/// use u_colony::scenario::{RandomStopSelector, RawPoint, StopSelector};
///
/// let points: Vec<RawPoint> = (0..50)
///     .map(|i| RawPoint { id: i, x: i as f64, y: (i * 7 % 13) as f64 })
///     .collect();
/// let selector = RandomStopSelector::new(10, 3).with_demand_range(2, 4);
/// let stops = selector.select_stops(&points);
/// assert_eq!(stops.len(), 10);
/// assert_eq!(stops[0].demand(), 0);
/// assert!(stops[1..].iter().all(|s| (2..=4).contains(&s.demand())));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomStopSelector {
    /// Points to sample, depot included.
    pub num_stops: usize,
    /// Inclusive demand range.
    pub demand: (u32, u32),
    /// Inclusive range of window opening minutes.
    pub window_start: (u32, u32),
    /// Inclusive range of window lengths in minutes.
    pub window_duration: (u32, u32),
    /// Service time of every customer stop.
    pub service_time: f64,
    /// Sampling seed.
    pub seed: u64,
}

impl RandomStopSelector {
    /// Samples `num_stops` points (depot included) with the default ranges:
    /// demand 1 to 10, windows opening between 08:00 and 12:00 and lasting
    /// one to three hours.
    pub fn new(num_stops: usize, seed: u64) -> Self {
        Self {
            num_stops,
            demand: (1, 10),
            window_start: (480, 720),
            window_duration: (60, 180),
            service_time: 0.0,
            seed,
        }
    }

    /// Sets the demand range.
    pub fn with_demand_range(mut self, min: u32, max: u32) -> Self {
        self.demand = (min, max);
        self
    }

    /// Sets the window opening range in minutes.
    pub fn with_window_start_range(mut self, earliest: u32, latest: u32) -> Self {
        self.window_start = (earliest, latest);
        self
    }

    /// Sets the window length range in minutes.
    pub fn with_window_duration_range(mut self, min: u32, max: u32) -> Self {
        self.window_duration = (min, max);
        self
    }

    /// Sets the service time of customer stops.
    pub fn with_service_time(mut self, minutes: f64) -> Self {
        self.service_time = minutes;
        self
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, (a, b): (u32, u32)) -> u32 {
    rng.random_range(a.min(b)..=a.max(b))
}

impl StopSelector for RandomStopSelector {
    fn select_stops(&self, points: &[RawPoint]) -> Vec<Stop> {
        let amount = self.num_stops.min(points.len());
        if amount < self.num_stops {
            warn!(
                requested = self.num_stops,
                available = points.len(),
                "not enough candidate points"
            );
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let picked = index::sample(&mut rng, points.len(), amount);

        let mut stops = Vec::with_capacity(amount);
        for (pos, idx) in picked.into_iter().enumerate() {
            let p = points[idx];
            if pos == 0 {
                let [ready, due] = DEFAULT_HORIZON;
                let mut depot = Stop::depot(p.x, p.y);
                if let Some(tw) = TimeWindow::new(ready, due) {
                    depot = depot.with_time_window(tw);
                }
                stops.push(depot);
                continue;
            }
            let demand = draw(&mut rng, self.demand);
            let start = f64::from(draw(&mut rng, self.window_start));
            let length = f64::from(draw(&mut rng, self.window_duration));
            let mut stop = Stop::new(pos, p.x, p.y, demand, self.service_time);
            if let Some(tw) = TimeWindow::new(start, start + length) {
                stop = stop.with_time_window(tw);
            }
            stops.push(stop);
        }
        debug!(selected = stops.len(), seed = self.seed, "random stops selected");
        stops
    }
}
