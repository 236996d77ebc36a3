//! JSON scenario documents.

use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::models::{Stop, TimeWindow};

/// Planning horizon in minutes used when a node gives no window (one day).
pub const DEFAULT_HORIZON: [f64; 2] = [0.0, 1440.0];

/// The depot entry of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDepot {
    /// External node id.
    pub id: u64,
    /// X coordinate.
    #[serde(default)]
    pub x: f64,
    /// Y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Opening hours `[earliest, latest]`; the whole day when absent.
    #[serde(default)]
    pub time_window_minutes: Option<[f64; 2]>,
}

/// One customer stop of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioNode {
    /// External node id.
    pub id: u64,
    /// X coordinate.
    #[serde(default)]
    pub x: f64,
    /// Y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Quantity to deliver.
    pub demand: u32,
    /// Allowed arrival `[earliest, latest]`; the whole day when absent.
    #[serde(default)]
    pub time_window_minutes: Option<[f64; 2]>,
    /// Service duration; the scenario default when absent.
    #[serde(default)]
    pub service_time_minutes: Option<f64>,
}

/// A stop set read from a JSON document.
///
/// # Examples
///
/// ```
/// use u_colony::scenario::Scenario;
///
/// let json = r#"{
///     "depot": { "id": 900, "x": 0.0, "y": 0.0 },
///     "default_service_time_minutes": 5,
///     "nodes": [
///         { "id": 17, "x": 3.0, "y": 4.0, "demand": 2, "time_window_minutes": [480, 600] },
///         { "id": 42, "x": 6.0, "y": 8.0, "demand": 3, "service_time_minutes": 12 }
///     ]
/// }"#;
/// let scenario = Scenario::from_json(json).unwrap();
/// let (stops, ids) = scenario.into_stops().unwrap();
/// assert_eq!(ids, vec![900, 17, 42]);
/// assert_eq!(stops[1].service_duration(), 5.0);
/// assert_eq!(stops[2].service_duration(), 12.0);
/// assert_eq!(stops[1].time_window().unwrap().due(), 600.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Start and end of every route.
    pub depot: ScenarioDepot,
    /// Service duration for nodes that give none.
    #[serde(default)]
    pub default_service_time_minutes: f64,
    /// Customer stops.
    pub nodes: Vec<ScenarioNode>,
}

impl Scenario {
    /// Parses a scenario from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a scenario from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Converts to positional stops (depot first, nodes in document order)
    /// and the matching external ids.
    pub fn into_stops(self) -> Result<(Vec<Stop>, Vec<u64>), ScenarioError> {
        if self.nodes.is_empty() {
            return Err(ScenarioError::Empty);
        }
        let mut seen = HashSet::with_capacity(self.nodes.len() + 1);
        let mut stops = Vec::with_capacity(self.nodes.len() + 1);
        let mut ids = Vec::with_capacity(self.nodes.len() + 1);

        seen.insert(self.depot.id);
        let depot = Stop::depot(self.depot.x, self.depot.y)
            .with_time_window(window(self.depot.id, self.depot.time_window_minutes)?);
        stops.push(depot);
        ids.push(self.depot.id);

        for node in self.nodes {
            if !seen.insert(node.id) {
                return Err(ScenarioError::DuplicateNode(node.id));
            }
            let service = node
                .service_time_minutes
                .unwrap_or(self.default_service_time_minutes);
            if !(service.is_finite() && service >= 0.0) {
                return Err(ScenarioError::ServiceTime {
                    node: node.id,
                    value: service,
                });
            }
            let stop = Stop::new(stops.len(), node.x, node.y, node.demand, service)
                .with_time_window(window(node.id, node.time_window_minutes)?);
            stops.push(stop);
            ids.push(node.id);
        }
        Ok((stops, ids))
    }
}

fn window(node: u64, raw: Option<[f64; 2]>) -> Result<TimeWindow, ScenarioError> {
    let [ready, due] = raw.unwrap_or(DEFAULT_HORIZON);
    TimeWindow::new(ready, due).ok_or(ScenarioError::TimeWindow { node, ready, due })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(nodes: &str) -> String {
        format!(r#"{{ "depot": {{ "id": 1 }}, "nodes": [{nodes}] }}"#)
    }

    #[test]
    fn test_defaults() {
        let s = Scenario::from_json(&doc(r#"{ "id": 2, "demand": 4 }"#)).expect("valid");
        let (stops, ids) = s.into_stops().expect("valid");
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(stops[0].demand(), 0);
        assert_eq!(stops[1].id(), 1);
        assert_eq!(stops[1].demand(), 4);
        assert_eq!(stops[1].service_duration(), 0.0);
        let tw = stops[1].time_window().expect("default window");
        assert_eq!((tw.ready(), tw.due()), (0.0, 1440.0));
        assert_eq!(stops[0].time_window().map(|tw| tw.due()), Some(1440.0));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Scenario::from_json("{ not json"),
            Err(ScenarioError::Parse(_))
        ));
        // demand missing
        assert!(matches!(
            Scenario::from_json(&doc(r#"{ "id": 2 }"#)),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn test_inverted_window() {
        let s = Scenario::from_json(&doc(
            r#"{ "id": 2, "demand": 1, "time_window_minutes": [600, 500] }"#,
        ))
        .expect("valid");
        assert!(matches!(
            s.into_stops(),
            Err(ScenarioError::TimeWindow { node: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        let s = Scenario::from_json(&doc(
            r#"{ "id": 2, "demand": 1 }, { "id": 2, "demand": 1 }"#,
        ))
        .expect("valid");
        assert!(matches!(s.into_stops(), Err(ScenarioError::DuplicateNode(2))));

        let s = Scenario::from_json(&doc(r#"{ "id": 1, "demand": 1 }"#)).expect("valid");
        assert!(matches!(s.into_stops(), Err(ScenarioError::DuplicateNode(1))));
    }

    #[test]
    fn test_negative_service_time() {
        let s = Scenario::from_json(&doc(r#"{ "id": 2, "demand": 1, "service_time_minutes": -3 }"#))
            .expect("valid");
        assert!(matches!(
            s.into_stops(),
            Err(ScenarioError::ServiceTime { node: 2, .. })
        ));
    }

    #[test]
    fn test_empty() {
        let s = Scenario::from_json(&doc("")).expect("valid");
        assert!(matches!(s.into_stops(), Err(ScenarioError::Empty)));
    }

    #[test]
    fn test_from_reader() {
        let json = doc(r#"{ "id": 5, "demand": 2 }"#);
        let s = Scenario::from_reader(json.as_bytes()).expect("valid");
        assert_eq!(s.nodes.len(), 1);
    }
}
