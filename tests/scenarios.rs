use rand::{Rng, SeedableRng};
use spacetime_planner::{
    Cell, Connectivity, DynamicObstacleTable, Planner, PlannerConfig, Termination,
};
use std::collections::HashMap;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("spacetime_planner=trace"))
        .try_init();
}

/// Wall cells one step outside a `size` x `size` grid.
fn boundary(size: i32) -> Vec<(i32, i32)> {
    let mut walls = Vec::new();
    for i in -1..=size {
        walls.push((i, -1));
        walls.push((i, size));
    }
    for i in 0..size {
        walls.push((-1, i));
        walls.push((size, i));
    }
    walls
}

#[test]
fn test_bounded_grid_open_path() {
    init_tracing();
    let planner = Planner::new(10, 0.0, &boundary(10)).unwrap();
    let none = DynamicObstacleTable::new();

    let path = planner.plan((0, 0), (5, 5), &none, 1000, true);

    assert_eq!(path.len(), 11);
    assert_eq!(path[0], Cell::new(0, 0));
    assert_eq!(path[10], Cell::new(5, 5));
    assert!(planner.validate_path(&path, &none).is_ok());
}

#[test]
fn test_start_is_goal() {
    let planner = Planner::new(10, 0.0, &boundary(10)).unwrap();
    let path = planner.plan((7.1, 2.8), (7, 3), &DynamicObstacleTable::new(), 1000, false);
    assert_eq!(path, vec![Cell::new(7, 3)]);
}

#[test]
fn test_agent_parked_at_centre_is_kept_at_distance() {
    let agent_until_t10: DynamicObstacleTable =
        (0..=10usize).map(|t| (t, vec![(3.0, 3.0)])).collect();

    // With boundary walls at radius 1 the start corner has no safe neighbour,
    // so there is nothing to check beyond the empty result.
    let walled = Planner::new(10, 1.0, &boundary(10)).unwrap();
    let path = walled.plan((0, 0), (5, 5), &agent_until_t10, 1000, false);
    for (t, cell) in path.iter().enumerate().take(11) {
        assert!(cell.distance_to((3.0, 3.0).into()) > 2.0, "t={t} at {cell}");
    }

    let open = Planner::new::<(i32, i32)>(10, 1.0, &[]).unwrap();
    let path = open.plan((0, 0), (5, 5), &agent_until_t10, 1000, false);
    assert!(!path.is_empty());
    assert_eq!(path.last(), Some(&Cell::new(5, 5)));
    assert!(path.len() > 11);
    for (t, cell) in path.iter().enumerate().take(11) {
        assert!(cell.distance_to((3.0, 3.0).into()) > 2.0, "t={t} at {cell}");
    }
    assert!(open.validate_path(&path, &agent_until_t10).is_ok());
}

#[test]
fn test_radius_covering_every_cell_yields_no_path() {
    // every cell of a 4x4 grid is within 3 of the centre obstacle
    let planner = Planner::new(4, 3.0, &[(1.5, 1.5)]).unwrap();
    let report = planner.plan_detailed((0, 0), (3, 3), &DynamicObstacleTable::new(), 1000, false);
    assert!(report.path.is_empty());
    assert_eq!(report.termination, Termination::OpenSetExhausted);
}

#[test]
fn test_out_of_range_queries_are_snapped() {
    let planner = Planner::new(6, 0.0, &boundary(6)).unwrap();
    let path = planner.plan((-20.0, -3.0), (40.0, 5.2), &DynamicObstacleTable::new(), 1000, false);
    assert_eq!(path.first(), Some(&Cell::new(0, 0)));
    assert_eq!(path.last(), Some(&Cell::new(5, 5)));
    assert_eq!(path.len(), 11);
}

#[test]
fn test_goal_on_obstacle_snaps_to_free_cell() {
    let planner = Planner::new(6, 0.0, &[(5, 5)]).unwrap();
    let path = planner.plan((0, 0), (5, 5), &DynamicObstacleTable::new(), 1000, false);
    // ring tie between (4, 5) and (5, 4) goes to the lower x
    assert_eq!(path.last(), Some(&Cell::new(4, 5)));
}

#[test]
fn test_dynamic_table_from_hash_map() {
    let planner = Planner::new(5, 0.0, &boundary(5)).unwrap();
    let mut agents: HashMap<usize, Vec<(f64, f64)>> = HashMap::new();
    agents.insert(1, vec![(1.0, 0.0)]);
    agents.insert(2, vec![(2.0, 0.0), (1.0, 1.0)]);
    let agents = DynamicObstacleTable::from(agents);

    let path = planner.plan((0, 0), (4, 0), &agents, 1000, false);
    assert_eq!(path.last(), Some(&Cell::new(4, 0)));
    assert!(planner.validate_path(&path, &agents).is_ok());
}

#[test]
fn test_corridor_needs_wait_move() {
    // 1-wide corridor along y = 0, an agent crosses (1, 0) at t=1 and t=2
    let mut walls = boundary(5);
    walls.extend((0..5).flat_map(|x| (1..5).map(move |y| (x, y))));
    let agents = DynamicObstacleTable::new()
        .with(1, [(1, 0)])
        .with(2, [(1, 0)]);

    let four_way = Planner::new(5, 0.0, &walls).unwrap();
    assert!(four_way.plan((0, 0), (4, 0), &agents, 1000, false).is_empty());

    let config = PlannerConfig::new(5, 0.0).with_connectivity(Connectivity::FourWayWithWait);
    let waiting = Planner::from_config(config, &walls).unwrap();
    let path = waiting.plan((0, 0), (4, 0), &agents, 1000, false);
    assert_eq!(path.len(), 7);
    assert_eq!(&path[..3], &[Cell::new(0, 0); 3]);
    assert!(waiting.validate_path(&path, &agents).is_ok());
}

#[test]
fn test_random_fields_produce_valid_paths() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..25 {
        let size = 12;
        let walls: Vec<(i32, i32)> = (0..20)
            .map(|_| (rng.gen_range(0..size), rng.gen_range(0..size)))
            .collect();
        let mut agents = DynamicObstacleTable::new();
        for t in 0..30 {
            let positions: Vec<(i32, i32)> = (0..3)
                .map(|_| (rng.gen_range(0..size), rng.gen_range(0..size)))
                .collect();
            agents.insert(t, positions);
        }
        let radius = if rng.gen_bool(0.5) { 0.0 } else { 0.5 };
        let planner = Planner::new(size as usize, radius, &walls).unwrap();

        let start = (rng.gen_range(0..size), rng.gen_range(0..size));
        let goal = (rng.gen_range(0..size), rng.gen_range(0..size));
        let path = planner.plan(start, goal, &agents, 5000, false);
        if path.is_empty() {
            continue;
        }
        assert_eq!(path[0], planner.grid().snap_to_grid(start.into()));
        assert_eq!(*path.last().unwrap(), planner.grid().snap_to_grid(goal.into()));
        assert!(planner.validate_path(&path, &agents).is_ok());
    }
}

#[test]
fn test_parallel_queries_share_one_planner() {
    let planner = Planner::new(16, 0.5, &boundary(16)).unwrap();
    let agents: DynamicObstacleTable = (0..40usize).map(|t| (t, vec![(8.0, (t % 16) as f64)])).collect();
    let queries = [((1, 1), (14, 14)), ((14, 1), (1, 14)), ((1, 8), (14, 8)), ((8, 1), (8, 14))];

    let sequential: Vec<Vec<Cell>> = queries
        .iter()
        .map(|&(s, g)| planner.plan(s, g, &agents, 20_000, false))
        .collect();

    let parallel: Vec<Vec<Cell>> = std::thread::scope(|scope| {
        let handles: Vec<_> = queries
            .iter()
            .map(|&(s, g)| {
                let planner = &planner;
                let agents = &agents;
                scope.spawn(move || planner.plan(s, g, agents, 20_000, false))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
