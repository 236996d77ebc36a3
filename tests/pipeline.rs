use u_colony::colony::{solve, ColonyConfig, ColonyRunner, RunResult, StopSignal, StrategyKind};
use u_colony::distance::EuclideanProvider;
use u_colony::models::{Fleet, Problem};
use u_colony::scenario::{RandomStopSelector, RawPoint, Scenario, StopSelector};

const SCENARIO: &str = r#"{
    "depot": { "id": 100, "x": 0.0, "y": 0.0, "time_window_minutes": [0, 600] },
    "default_service_time_minutes": 2,
    "nodes": [
        { "id": 7,  "x": 10.0, "y": 0.0,  "demand": 3, "time_window_minutes": [0, 100] },
        { "id": 8,  "x": 10.0, "y": 10.0, "demand": 2 },
        { "id": 9,  "x": 0.0,  "y": 10.0, "demand": 4, "time_window_minutes": [20, 200] },
        { "id": 10, "x": -5.0, "y": 5.0,  "demand": 1, "service_time_minutes": 10 },
        { "id": 11, "x": 5.0,  "y": -5.0, "demand": 5 }
    ]
}"#;

#[test]
fn scenario_document_solves_end_to_end() {
    let (stops, ids) = Scenario::from_json(SCENARIO)
        .expect("parse")
        .into_stops()
        .expect("stops");
    let fleet = Fleet::homogeneous(8, 3).expect("valid");
    let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).expect("problem");

    let result = solve(&problem, ColonyConfig::default().with_max_iterations(40)).expect("run");
    assert!(result.feasible);

    let mut served: Vec<u64> = result
        .best
        .routes()
        .iter()
        .flat_map(|r| r.stop_ids())
        .map(|i| ids[i])
        .collect();
    served.sort_unstable();
    assert_eq!(served, vec![7, 8, 9, 10, 11]);
    assert!(result.best.routes().iter().all(|r| r.return_time() <= 600.0));
}

#[test]
fn run_result_survives_json() {
    let (stops, _) = Scenario::from_json(SCENARIO)
        .expect("parse")
        .into_stops()
        .expect("stops");
    let fleet = Fleet::homogeneous(8, 3).expect("valid");
    let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).expect("problem");
    let config = ColonyConfig::default()
        .with_strategy(StrategyKind::Mmas)
        .with_max_iterations(10);

    let result = solve(&problem, config).expect("run");
    let json = serde_json::to_string(&result).expect("serialize");
    let back: RunResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.termination, result.termination);
    assert_eq!(back.convergence.len(), result.convergence.len());
    assert_eq!(back.best.routes().len(), result.best.routes().len());
    let (a, b) = (back.best.total_cost(), result.best.total_cost());
    assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0));
}

#[test]
fn random_selection_feeds_a_run() {
    let points: Vec<RawPoint> = (0..200)
        .map(|i| RawPoint {
            id: 1000 + i,
            x: (i % 20) as f64 * 3.0,
            y: (i / 20) as f64 * 3.0,
        })
        .collect();
    let stops = RandomStopSelector::new(12, 21)
        .with_window_start_range(0, 0)
        .with_window_duration_range(1440, 1440)
        .select_stops(&points);
    let fleet = Fleet::homogeneous(60, 4).expect("valid");
    let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).expect("problem");

    let config = ColonyConfig::default().with_num_ants(6).with_max_iterations(15);
    let runner = ColonyRunner::new(&problem, config).expect("valid config");
    let signal = StopSignal::new();
    let result = runner.run_with_stop(&signal).expect("run");

    assert!(result.feasible);
    assert_eq!(result.best.num_served(), 11);
    assert_eq!(result.convergence.len(), result.iterations);
}
