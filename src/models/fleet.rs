//! Vehicle classes and the fleet they form.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A group of identical vehicles.
///
/// # Examples
///
/// ```
/// use u_colony::models::VehicleClass;
///
/// let class = VehicleClass::new(15, 2).unwrap();
/// assert_eq!(class.capacity(), 15);
/// assert_eq!(class.fleet_size(), 2);
/// assert!(VehicleClass::new(0, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleClass {
    capacity: u32,
    fleet_size: usize,
}

impl VehicleClass {
    /// Creates a vehicle class; both capacity and fleet size must be positive.
    pub fn new(capacity: u32, fleet_size: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::invalid("capacity", "must be > 0"));
        }
        if fleet_size == 0 {
            return Err(ConfigError::invalid("fleet_size", "must be > 0"));
        }
        Ok(Self {
            capacity,
            fleet_size,
        })
    }

    /// Maximum load of each vehicle in this class.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of vehicles available in this class.
    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }
}

/// A single dispatchable vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Position in [`Fleet::vehicles`].
    pub index: usize,
    /// Class the vehicle belongs to.
    pub class: usize,
    /// Maximum load.
    pub capacity: u32,
}

/// The vehicles available for a run, grouped into classes.
///
/// Vehicles are dispatched class by class in declaration order.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Fleet, VehicleClass};
///
/// let fleet = Fleet::new(vec![
///     VehicleClass::new(20, 1).unwrap(),
///     VehicleClass::new(10, 2).unwrap(),
/// ]).unwrap();
/// let caps: Vec<u32> = fleet.vehicles().iter().map(|v| v.capacity).collect();
/// assert_eq!(caps, vec![20, 10, 10]);
/// assert_eq!(fleet.total_capacity(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    classes: Vec<VehicleClass>,
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    /// Creates a fleet from one or more vehicle classes.
    pub fn new(classes: Vec<VehicleClass>) -> Result<Self, ConfigError> {
        if classes.is_empty() {
            return Err(ConfigError::invalid(
                "fleet_size",
                "at least one vehicle class is required",
            ));
        }
        let mut vehicles = Vec::new();
        for (class, vc) in classes.iter().enumerate() {
            for _ in 0..vc.fleet_size() {
                vehicles.push(Vehicle {
                    index: vehicles.len(),
                    class,
                    capacity: vc.capacity(),
                });
            }
        }
        Ok(Self { classes, vehicles })
    }

    /// A fleet of `fleet_size` identical vehicles.
    pub fn homogeneous(capacity: u32, fleet_size: usize) -> Result<Self, ConfigError> {
        Self::new(vec![VehicleClass::new(capacity, fleet_size)?])
    }

    /// Builds one single-vehicle class per capacity, in order.
    pub fn from_capacities(capacities: &[u32]) -> Result<Self, ConfigError> {
        let classes = capacities
            .iter()
            .map(|&c| VehicleClass::new(c, 1))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(classes)
    }

    /// The vehicle classes in declaration order.
    pub fn classes(&self) -> &[VehicleClass] {
        &self.classes
    }

    /// Every individual vehicle in dispatch order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Total number of vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Always `false` for a constructed fleet.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Sum of all vehicle capacities.
    pub fn total_capacity(&self) -> u64 {
        self.vehicles.iter().map(|v| u64::from(v.capacity)).sum()
    }
}
