//! Self-play demo for the Ludo planner
//!
//! Blue rolls a die and asks the planner for a move; Red answers with the
//! aggressive rollout heuristic. Run with `RUST_LOG=debug` to see the
//! planner's statistics after every search.

use std::env;

use ludo_mcts::{
    policy::simulation::{HeuristicRollout, RolloutPolicy},
    roll_die, Color, ExtraTurnPolicy, GameState, PlannerConfig, MCTS,
};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    // Initialize logging
    env_logger::init();

    let n_simulations = env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(1_000);

    println!("Ludo MCTS Self-Play");
    println!("===================");
    println!("Blue: planner with {} simulations", n_simulations);
    println!("Red:  aggressive heuristic");
    println!();

    let mut rng = StdRng::seed_from_u64(2024);
    let mut game = GameState::initial(Color::Blue).with_extra_turn_policy(ExtraTurnPolicy::OnSix);
    let red_policy = HeuristicRollout::aggressive();
    let config = PlannerConfig::default().with_n_simulations(n_simulations);

    let mut turn = 0;
    while !game.is_terminal() {
        turn += 1;
        let player = game.current_player();
        let roll = roll_die(&mut rng);

        if game.get_legal_actions(roll).is_empty() {
            println!("{:>4}. {} rolls {} and passes", turn, player, roll);
            game.pass_turn();
            continue;
        }

        let action = match player {
            Color::Blue => {
                let mut mcts = MCTS::new(game.clone(), config.clone()).with_root_roll(roll);
                match mcts.search_with_rng(&mut rng) {
                    Ok(action) => action,
                    Err(e) => {
                        println!("Error: {}", e);
                        return;
                    }
                }
            }
            Color::Red => match red_policy.select_move(&game, roll, &mut rng) {
                Some(action) => action,
                None => {
                    game.pass_turn();
                    continue;
                }
            },
        };

        match game.apply_action(action) {
            Ok(report) => {
                print!("{:>4}. {} rolls {}: {}", turn, player, report.roll, action);
                if let Some(captured) = report.captured {
                    print!(", captures {} token {}", player.opponent(), captured);
                }
                if report.extra_turn {
                    print!(", rolls again");
                }
                println!();
            }
            Err(e) => {
                println!("Error: {}", e);
                return;
            }
        }
    }

    println!();
    println!("{}", game);
    if let Some(winner) = game.winner() {
        println!("{} wins after {} turns!", winner, turn);
    }
}
