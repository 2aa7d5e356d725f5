use ludo_mcts::{Action, Color, GameState, PlannerConfig, MCTS};
use std::time::{Duration, Instant};

#[test]
fn test_time_limited_search() {
    let state = GameState::new([3, 17, -1, -1], [28, 9, -1, -1], Color::Blue).unwrap();
    let time_limit = Duration::from_millis(50);

    let config = PlannerConfig::default()
        .with_max_time(time_limit)
        .with_n_simulations(100_000_000) // time is the limiting factor
        .with_seed(1);

    let mut mcts = MCTS::new(state.clone(), config);

    let start = Instant::now();
    let result = mcts.search();
    let elapsed = start.elapsed();

    println!("Time limit: {:?}, Actual time: {:?}", time_limit, elapsed);
    println!("Stats: {}", mcts.get_statistics().summary());

    let action = result.unwrap();
    assert!((1..=6).any(|roll| state.get_legal_actions(roll).contains(&action)));

    let stats = mcts.get_statistics();
    assert!(stats.stopped_early);
    assert!(stats.simulations < 100_000_000);
    assert_eq!(mcts.tree().root().visits(), stats.simulations as u64);
}

#[test]
fn test_zero_time_falls_back_to_first_legal_move() {
    let config = PlannerConfig::default()
        .with_max_time(Duration::ZERO)
        .with_seed(2);
    let mut mcts = MCTS::new(GameState::initial(Color::Blue), config);

    // Nothing is searched, so the first move of the lowest usable roll wins
    assert_eq!(mcts.search().unwrap(), Action::new(0, 0));

    let stats = mcts.get_statistics();
    assert!(stats.stopped_early);
    assert_eq!(stats.simulations, 0);
    assert_eq!(stats.tree_size, 1);
}

#[test]
fn test_zero_time_with_pinned_roll() {
    let state = GameState::new([3, 17, -1, -1], [28, 9, -1, -1], Color::Blue).unwrap();
    let config = PlannerConfig::default().with_max_time(Duration::ZERO);

    let mut mcts = MCTS::new(state, config).with_root_roll(4);

    assert_eq!(mcts.search().unwrap(), Action::new(0, 7));
}

#[test]
fn test_generous_time_limit_runs_full_budget() {
    let config = PlannerConfig::default()
        .with_max_time(Duration::from_secs(600))
        .with_n_simulations(50)
        .with_seed(3);
    let mut mcts = MCTS::new(GameState::initial(Color::Red), config);

    mcts.search().unwrap();

    let stats = mcts.get_statistics();
    assert!(!stats.stopped_early);
    assert_eq!(stats.simulations, 50);
}
