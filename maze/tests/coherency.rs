use futures::future::join_all;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_wyrand::WyRand;

use maze::{
    build_set, efficiency_score, generate, goal_position, set::default_configs, shortest_path,
    BenchmarkConfig, Cell, Difficulty, Direction, Environment, Grid, ObservationMode, Pos,
    Profile, Shaping,
};

fn random_profile(rng: &mut impl Rng) -> Profile {
    Profile {
        loop_density: rng.gen_range(0. ..0.3),
        shaping: if rng.gen_bool(0.5) {
            Shaping::ContinuationBias(rng.gen_range(0. ..=1.))
        } else {
            Shaping::DeadEndFill(rng.gen_range(0. ..=1.))
        },
    }
}

fn check_invariants(grid: &Grid) {
    let [w, h] = grid.shape();
    for pos in (0..w).flat_map(|x| (0..h).map(move |y| Pos::new(x, y))) {
        if grid.on_boundary(pos) {
            assert_eq!(grid.get(pos), Some(Cell::Wall), "boundary open at {pos}");
        }
    }
    assert_eq!(grid.count(Cell::Start), 1);
    assert_eq!(grid.count(Cell::Goal), 1);
    assert_eq!(grid.find(Cell::Start), Some(Pos::START));
    assert_eq!(grid.find(Cell::Goal), Some(goal_position(w, h)));
}

#[tokio::test]
async fn coherency() {
    join_all((0..10u64).map(|task| async move {
        let mut rng = WyRand::seed_from_u64(task);
        join_all((0..10).map(|_| {
            let width = rng.gen_range(5..40);
            let height = rng.gen_range(5..40);
            let profile = random_profile(&mut rng);
            let seed: u32 = rng.gen();
            async move {
                // two independent generations of the same maze
                let (a, b) = tokio::join!(
                    async { generate(width, height, &profile, seed).unwrap() },
                    async { generate(width, height, &profile, seed).unwrap() }
                );
                assert_eq!(a.to_rows(), b.to_rows());
                check_invariants(&a);
                let [w, h] = a.shape();
                let path = shortest_path(&a, Pos::START, goal_position(w, h))
                    .expect("generated mazes are always solvable");
                assert!(path.len() >= (w - 3) + (h - 3));
                assert_eq!(Some(path), shortest_path(&b, Pos::START, goal_position(w, h)));
            }
        }))
        .await;
    }))
    .await;
}

#[test]
fn tiny_simple_maze() {
    let grid = generate(5, 5, &Difficulty::Simple.profile(), 12345).unwrap();
    let rows = grid.to_rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], "#####");
    assert_eq!(rows[4], "#####");
    assert!(rows.iter().all(|r| r.starts_with('#') && r.ends_with('#')));
    assert_eq!(&rows[1][1..2], "S");
    assert_eq!(&rows[3][3..4], "G");

    let path = shortest_path(&grid, Pos::new(1, 1), Pos::new(3, 3)).unwrap();
    assert!(path.len() >= 4);
    let again = generate(5, 5, &Difficulty::Simple.profile(), 12345).unwrap();
    assert_eq!(
        shortest_path(&again, Pos::new(1, 1), Pos::new(3, 3))
            .unwrap()
            .len(),
        path.len()
    );
}

#[test]
fn following_the_oracle_succeeds() {
    let configs = [BenchmarkConfig::new(5, 5, Difficulty::Simple, ObservationMode::Local)];
    let set = build_set(&configs, 1).unwrap();
    let record = &set[0];
    let path = shortest_path(&record.grid, Pos::START, record.goal()).unwrap();
    let moves: Vec<Direction> = path.directions().collect();

    let mut env = Environment::new(record);
    for (i, d) in moves.iter().enumerate() {
        let outcome = env.step_str(d.as_str()).unwrap();
        assert_eq!(outcome.success, i + 1 == moves.len());
        assert_eq!(env.position(), path.positions()[i + 1]);
    }
    assert_eq!(env.position(), Pos::new(3, 3));
    assert_eq!(env.steps(), moves.len());
    assert_eq!(Some(env.steps()), record.optimal_path_length);
    assert_eq!(
        efficiency_score(record.optimal_path_length, env.outcome()),
        1.
    );
}

#[test]
fn random_walkers_never_beat_the_oracle() {
    let mut rng = WyRand::seed_from_u64(0x5EED);
    let set = build_set(&default_configs()[..12], 2).unwrap();
    for record in &set {
        let optimal = record.optimal_path_length.unwrap();
        for _ in 0..5 {
            let mut env = Environment::new(record);
            let mut bumps = 0;
            for _ in 0..2_000 {
                let before = env.position();
                let d = *Direction::ALL.choose(&mut rng).unwrap();
                let outcome = env.step(d);
                if env.position() == before {
                    bumps += 1;
                }
                if outcome.success {
                    break;
                }
            }
            let outcome = env.outcome();
            assert!(env.steps() >= bumps);
            if outcome.success {
                assert!(outcome.steps >= optimal);
                let score = efficiency_score(Some(optimal), outcome);
                assert!(score > 0. && score <= 1.);
            } else {
                assert_eq!(efficiency_score(Some(optimal), outcome), 0.);
            }
        }
    }
}

#[test]
fn local_window_is_fixed_everywhere() {
    let grid = generate(9, 7, &Difficulty::Normal.profile(), 3).unwrap();
    let mut env = Environment::from_grid(std::sync::Arc::new(grid), ObservationMode::Local);
    let mut rng = WyRand::seed_from_u64(11);
    for _ in 0..200 {
        let d = *Direction::ALL.choose(&mut rng).unwrap();
        let observation = env.step(d).observation;
        let rows: Vec<&str> = observation.split('\n').collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.chars().count() == 5));
        assert_eq!(rows[2].chars().nth(2), Some('A'));
        if env.is_done() {
            break;
        }
    }
}
