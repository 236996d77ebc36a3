//! # u-colony
//!
//! Ant colony optimization for the capacitated vehicle routing problem with
//! time windows, with Elitist (EAS) and Max-Min (MMAS) Ant System updates.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Stop, Fleet, Route, Solution, Problem)
//! - [`distance`]: Cost matrix and the providers that supply it
//! - [`evaluation`]: Schedule rebuilding, feasibility checking and cost
//! - [`colony`]: Pheromone model, ant construction, strategies, run loop
//! - [`scenario`]: JSON scenarios and random stop selection
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use u_colony::colony::{solve, ColonyConfig};
//! use u_colony::distance::EuclideanProvider;
//! use u_colony::models::{Fleet, Problem, Stop};
//!
//! let stops = vec![
//!     Stop::depot(0.0, 0.0),
//!     Stop::new(1, 1.0, 0.0, 4, 0.0),
//!     Stop::new(2, 1.0, 1.0, 4, 0.0),
//!     Stop::new(3, -1.0, 0.0, 4, 0.0),
//! ];
//! let fleet = Fleet::homogeneous(8, 2).unwrap();
//! let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).unwrap();
//!
//! let result = solve(&problem, ColonyConfig::default().with_max_iterations(20)).unwrap();
//! assert!(result.feasible);
//! assert_eq!(result.best.num_served(), 3);
//! ```

pub mod colony;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod scenario;
