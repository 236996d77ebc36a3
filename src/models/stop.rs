//! Stop and time window types.

use serde::{Deserialize, Serialize};

/// Allowed arrival interval `[ready, due]` of a stop, in minutes.
///
/// Arriving before `ready` means waiting; arriving after `due` is late.
///
/// # Examples
///
/// ```
/// use u_colony::models::TimeWindow;
///
/// let tw = TimeWindow::new(480.0, 600.0).unwrap();
/// assert!(tw.contains(500.0));
/// assert_eq!(tw.waiting_time(450.0), 30.0);
/// assert_eq!(tw.lateness(610.0), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    open: f64,
    close: f64,
}

impl TimeWindow {
    /// `None` unless both bounds are finite and `ready <= due`.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        (ready.is_finite() && due.is_finite() && ready <= due).then_some(Self {
            open: ready,
            close: due,
        })
    }

    /// Opening minute.
    pub fn ready(&self) -> f64 {
        self.open
    }

    /// Closing minute; the latest on-time arrival.
    pub fn due(&self) -> f64 {
        self.close
    }

    /// Whether `time` lies inside the window, bounds included.
    pub fn contains(&self, time: f64) -> bool {
        (self.open..=self.close).contains(&time)
    }

    /// Idle time before service can start.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        (self.open - arrival).max(0.0)
    }

    /// Whether `arrival` is after closing.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.close
    }

    /// Minutes past closing, zero when on time.
    pub fn lateness(&self, arrival: f64) -> f64 {
        (arrival - self.close).max(0.0)
    }
}

/// A stop (or the depot) in a routing problem.
///
/// Stop 0 is the depot. The id doubles as the row/column index into the
/// cost and pheromone matrices. Coordinates are only read by cost providers
/// and other external collaborators; the optimizer itself never looks at them.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Stop, TimeWindow};
///
/// let depot = Stop::depot(29.0, 41.0);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let s = Stop::new(1, 29.1, 41.1, 4, 10.0)
///     .with_time_window(TimeWindow::new(480.0, 720.0).unwrap());
/// assert_eq!(s.demand(), 4);
/// assert!(s.time_window().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: usize,
    x: f64,
    y: f64,
    demand: u32,
    service_duration: f64,
    time_window: Option<TimeWindow>,
}

impl Stop {
    /// A stop open all day.
    pub fn new(id: usize, x: f64, y: f64, demand: u32, service_duration: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_duration,
            time_window: None,
        }
    }

    /// The depot: position 0, no demand, no service time.
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0, 0.0)
    }

    /// Restricts arrivals to `tw`.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Stop index (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate (longitude for geographic data).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate (latitude for geographic data).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Quantity to deliver at this stop.
    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Time spent serving this stop once service starts.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Arrival window, `None` meaning unrestricted.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    /// Earliest service start, or 0 without a window.
    pub fn ready_time(&self) -> f64 {
        self.time_window.map_or(0.0, |tw| tw.ready())
    }

    /// Straight-line distance.
    pub fn distance_to(&self, other: &Stop) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
