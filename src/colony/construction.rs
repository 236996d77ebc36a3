//! Probabilistic solution construction (one ant).

use rand::Rng;

use crate::evaluation::visit_timing;
use crate::models::{Problem, Route, Solution, Visit, DEPOT};

use super::{ColonyConfig, PheromoneMatrix};

/// Builds one complete solution by walking the fleet vehicle by vehicle.
///
/// From the current location the ant considers every unvisited stop that
/// fits the remaining capacity, can be reached before its window closes and,
/// when the depot has a window, still lets the vehicle get home in time. It
/// picks one with probability proportional to
/// `tau(i, j)^alpha * (1 / distance(i, j))^beta`. When nothing fits, the
/// vehicle returns and the next one starts. Stops left after the last vehicle
/// are recorded as unassigned.
///
/// The returned solution carries incrementally computed schedules and raw
/// cost. It is not yet evaluated.
///
/// A pheromone matrix sized for a different problem yields a solution with
/// no routes and every stop unassigned.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_colony::colony::{construct_solution, ColonyConfig, PheromoneMatrix};
/// use u_colony::distance::EuclideanProvider;
/// use u_colony::models::{Fleet, Problem, Stop};
///
/// let stops = vec![
///     Stop::depot(0.0, 0.0),
///     Stop::new(1, 1.0, 0.0, 4, 0.0),
///     Stop::new(2, 0.0, 1.0, 4, 0.0),
///     Stop::new(3, 1.0, 1.0, 4, 0.0),
/// ];
/// let fleet = Fleet::homogeneous(8, 2).unwrap();
/// let problem = Problem::from_provider(stops, fleet, &EuclideanProvider::default()).unwrap();
/// let tau = PheromoneMatrix::new(4, 1.0, true).unwrap();
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let sol = construct_solution(&problem, &tau, &ColonyConfig::default(), &mut rng);
/// assert_eq!(sol.num_served(), 3);
/// assert!(sol.routes().iter().all(|r| r.total_load() <= 8));
/// ```
pub fn construct_solution<R>(
    problem: &Problem,
    pheromone: &PheromoneMatrix,
    config: &ColonyConfig,
    rng: &mut R,
) -> Solution
where
    R: Rng + ?Sized,
{
    let stops = problem.stops();
    let costs = problem.costs();
    let n = stops.len();
    let depot = problem.depot();
    let depot_due = depot.time_window().map(|tw| tw.due());

    let mut solution = Solution::new();
    if pheromone.size() != n {
        for sid in 1..n {
            solution.add_unassigned(sid);
        }
        solution.set_raw_cost(0.0);
        return solution;
    }

    let mut visited = vec![false; n];
    visited[DEPOT] = true;
    let mut remaining = n - 1;
    let mut candidates: Vec<(usize, f64)> = Vec::with_capacity(n);

    for vehicle in problem.fleet().vehicles() {
        if remaining == 0 {
            break;
        }
        let mut route = Route::new(vehicle, depot.ready_time());
        let mut time = route.start_time();
        let mut load: u32 = 0;
        let mut distance = 0.0;
        let mut current = DEPOT;

        loop {
            candidates.clear();
            for (j, stop) in stops.iter().enumerate().skip(1) {
                if visited[j] {
                    continue;
                }
                match load.checked_add(stop.demand()) {
                    Some(l) if l <= vehicle.capacity => {}
                    _ => continue,
                }
                let (arrival, _, departure) =
                    visit_timing(stop, time, costs.duration(current, j));
                if stop.time_window().is_some_and(|tw| tw.is_violated(arrival)) {
                    continue;
                }
                if depot_due.is_some_and(|due| departure + costs.duration(j, DEPOT) > due) {
                    continue;
                }
                let tau = pheromone.get(current, j);
                let eta = 1.0 / costs.distance(current, j);
                candidates.push((j, tau.powf(config.alpha) * eta.powf(config.beta)));
            }

            let Some(next) = roulette(&candidates, rng) else {
                break;
            };
            let stop = &stops[next];
            distance += costs.distance(current, next);
            let (arrival_time, service_start, departure_time) =
                visit_timing(stop, time, costs.duration(current, next));
            load += stop.demand();
            route.push_visit(Visit {
                stop_id: next,
                arrival_time,
                service_start,
                departure_time,
                load_after: load,
            });
            time = departure_time;
            current = next;
            visited[next] = true;
            remaining -= 1;
        }

        if !route.is_empty() {
            distance += costs.distance(current, DEPOT);
            time += costs.duration(current, DEPOT);
            route.close(distance, time);
            solution.add_route(route);
        }
    }

    for (sid, _) in visited.iter().enumerate().filter(|(_, v)| !**v) {
        solution.add_unassigned(sid);
    }
    let raw = config.cost_model.routes_cost(solution.routes());
    solution.set_raw_cost(raw);
    solution
}

/// Roulette-wheel pick over `(stop, weight)` pairs in the given order.
///
/// Falls back to the first candidate when the weights do not sum to a
/// positive finite total.
pub(crate) fn roulette<R>(candidates: &[(usize, f64)], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let (first, _) = *candidates.first()?;
    let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
    if !(total.is_finite() && total > 0.0) {
        return Some(first);
    }
    let r = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for &(j, w) in candidates {
        acc += w;
        if acc > r {
            return Some(j);
        }
    }
    candidates.last().map(|&(j, _)| j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{CostMatrix, EuclideanProvider};
    use crate::evaluation::SolutionEvaluator;
    use crate::models::{Fleet, Stop, TimeWindow};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid_problem(capacity: u32, fleet_size: usize) -> Problem {
        let mut stops = vec![Stop::depot(0.0, 0.0)];
        for i in 1..=6 {
            stops.push(Stop::new(i, (i % 3) as f64 + 1.0, (i / 3) as f64 * 2.0, 3, 1.0));
        }
        Problem::from_provider(
            stops,
            Fleet::homogeneous(capacity, fleet_size).expect("valid"),
            &EuclideanProvider::default(),
        )
        .expect("valid")
    }

    #[test]
    fn test_construct_mismatched_trail_size_serves_nothing() {
        let problem = grid_problem(20, 2);
        let tau = PheromoneMatrix::new(3, 1.0, true).expect("valid");
        let mut rng = SmallRng::seed_from_u64(3);
        let sol = construct_solution(&problem, &tau, &ColonyConfig::default(), &mut rng);
        assert!(sol.routes().is_empty());
        assert_eq!(sol.unassigned(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(sol.raw_cost(), 0.0);
    }

    #[test]
    fn test_roulette_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(roulette(&[], &mut rng), None);
    }

    #[test]
    fn test_roulette_degenerate_weights_pick_lowest_index() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(roulette(&[(4, 0.0), (7, 0.0)], &mut rng), Some(4));
        assert_eq!(roulette(&[(2, f64::NAN), (3, 1.0)], &mut rng), Some(2));
        assert_eq!(roulette(&[(5, f64::INFINITY), (6, 1.0)], &mut rng), Some(5));
    }

    #[test]
    fn test_roulette_never_picks_zero_weight() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..200 {
            assert_eq!(roulette(&[(1, 0.0), (2, 1.0), (3, 0.0)], &mut rng), Some(2));
        }
    }

    #[test]
    fn test_roulette_follows_weights() {
        let mut rng = SmallRng::seed_from_u64(3);
        let picks = (0..4000)
            .filter(|_| roulette(&[(1, 1.0), (2, 3.0)], &mut rng) == Some(2))
            .count();
        assert!((2700..3300).contains(&picks), "picked 2 {picks} times");
    }

    #[test]
    fn test_construct_covers_all_with_enough_fleet() {
        let p = grid_problem(9, 3);
        let tau = PheromoneMatrix::new(7, 1.0, true).expect("valid");
        let mut rng = SmallRng::seed_from_u64(11);
        let sol = construct_solution(&p, &tau, &ColonyConfig::default(), &mut rng);
        assert!(sol.unassigned().is_empty());
        let mut ids: Vec<usize> = sol.routes().iter().flat_map(|r| r.stop_ids()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert!(sol.routes().iter().all(|r| r.total_load() <= 9 && !r.is_empty()));
    }

    #[test]
    fn test_construct_exhausted_fleet_leaves_unassigned() {
        let p = grid_problem(6, 1);
        let tau = PheromoneMatrix::new(7, 1.0, true).expect("valid");
        let mut rng = SmallRng::seed_from_u64(11);
        let sol = construct_solution(&p, &tau, &ColonyConfig::default(), &mut rng);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_served(), 2);
        assert_eq!(sol.unassigned().len(), 4);
    }

    #[test]
    fn test_construct_cost_matches_evaluator() {
        let p = grid_problem(9, 3);
        let config = ColonyConfig::default();
        let tau = PheromoneMatrix::new(7, 1.0, true).expect("valid");
        let evaluator = SolutionEvaluator::new(&p, config.cost_model, config.penalty_weight);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sol = construct_solution(&p, &tau, &config, &mut rng);
            let eval = evaluator.evaluate(&sol);
            assert_eq!(sol.raw_cost(), eval.raw_cost);
            for route in sol.routes() {
                let vehicle = p.fleet().vehicles()[route.vehicle_index()];
                assert_eq!(&evaluator.build_route(&vehicle, &route.stop_ids()), route);
            }
        }
    }

    #[test]
    fn test_construct_skips_unreachable_window() {
        let stops = vec![
            Stop::depot(0.0, 0.0),
            Stop::new(1, 1.0, 0.0, 1, 0.0),
            Stop::new(2, 50.0, 0.0, 1, 0.0).with_time_window(TimeWindow::new(0.0, 10.0).expect("valid")),
        ];
        let p = Problem::from_provider(
            stops,
            Fleet::homogeneous(10, 2).expect("valid"),
            &EuclideanProvider::default(),
        )
        .expect("valid");
        let tau = PheromoneMatrix::new(3, 1.0, true).expect("valid");
        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sol = construct_solution(&p, &tau, &ColonyConfig::default(), &mut rng);
            assert_eq!(sol.unassigned(), &[2]);
        }
    }

    #[test]
    fn test_construct_respects_depot_closing() {
        // stop 2 can be reached on time but the vehicle could not get home
        let stops = vec![
            Stop::depot(0.0, 0.0).with_time_window(TimeWindow::new(0.0, 30.0).expect("valid")),
            Stop::new(1, 5.0, 0.0, 1, 0.0),
            Stop::new(2, 20.0, 0.0, 1, 0.0).with_time_window(TimeWindow::new(0.0, 25.0).expect("valid")),
        ];
        let p = Problem::from_provider(
            stops,
            Fleet::homogeneous(10, 1).expect("valid"),
            &EuclideanProvider::default(),
        )
        .expect("valid");
        let tau = PheromoneMatrix::new(3, 1.0, true).expect("valid");
        let mut rng = SmallRng::seed_from_u64(5);
        let sol = construct_solution(&p, &tau, &ColonyConfig::default(), &mut rng);
        assert_eq!(sol.unassigned(), &[2]);
        assert!(sol.routes()[0].return_time() <= 30.0);
    }

    #[test]
    fn test_construct_follows_strong_trail() {
        // asymmetric triangle where the trail pins 0 -> 2 -> 1 -> 0
        let stops = vec![
            Stop::depot(0.0, 0.0),
            Stop::new(1, 0.0, 0.0, 1, 0.0),
            Stop::new(2, 0.0, 0.0, 1, 0.0),
        ];
        let costs = CostMatrix::from_distances(3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0])
            .expect("valid");
        let p = Problem::new(stops, Fleet::homogeneous(5, 1).expect("valid"), costs).expect("valid");
        let mut tau = PheromoneMatrix::new(3, 1e-9, false).expect("valid");
        tau.deposit([(0, 2), (2, 1)], 1.0);
        let config = ColonyConfig::default().with_weights(4.0, 1.0);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sol = construct_solution(&p, &tau, &config, &mut rng);
            assert_eq!(sol.routes()[0].stop_ids(), vec![2, 1]);
        }
    }
}
