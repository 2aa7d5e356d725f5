//! # ludo-mcts
//!
//! A two-player Ludo ("Mensch ärgere dich nicht") engine and a Monte Carlo
//! Tree Search (MCTS) planner that picks moves for it.
//!
//! The crate has two halves that are built for each other:
//!
//! - An exact, cheap-to-copy transition engine ([`GameState`]): legal-move
//!   generation for a die roll, captures, finish-lane entry and configurable
//!   extra turns.
//! - A planner ([`MCTS`]) that copies that state thousands of times per
//!   decision, plays random continuations and returns the root action that
//!   held up best.
//!
//! ## Basic Usage
//!
//! ```
//! use ludo_mcts::{choose_blue_move, Color, GameState};
//!
//! fn main() -> Result<(), ludo_mcts::LudoError> {
//!     // Blue has two tokens out, Red one.
//!     let state = GameState::new([3, 17, -1, -1], [8, -1, -1, -1], Color::Blue)?;
//!
//!     let action = choose_blue_move(&state, 200)?;
//!     println!("Blue moves {}", action);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Planning for a known roll
//!
//! [`choose_blue_move`] plans before the die is cast and returns the action
//! that is most promising over all faces. Once the roll is known, pin it:
//!
//! ```
//! use ludo_mcts::{Color, ExtraTurnPolicy, GameState, PlannerConfig, MCTS};
//! use ludo_mcts::policy::simulation::HeuristicRollout;
//!
//! fn main() -> Result<(), ludo_mcts::LudoError> {
//!     let state = GameState::new([3, 17, -1, -1], [8, -1, -1, -1], Color::Blue)?;
//!
//!     let config = PlannerConfig::default()
//!         .with_n_simulations(200)
//!         .with_extra_turn_policy(ExtraTurnPolicy::OnSix)
//!         .with_seed(42);
//!
//!     let mut mcts = MCTS::new(state.clone(), config)
//!         .with_rollout_policy(HeuristicRollout::aggressive())
//!         .with_root_roll(5);
//!
//!     let action = mcts.search()?;
//!     assert!(state.get_legal_actions(5).contains(&action));
//!     println!("{}", mcts.get_statistics().summary());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each simulation walks four phases:
//!
//! 1. **Selection**: from the root, roll a die and pick among the children
//!    legal for that roll with UCB1, until a node has an untried ply.
//! 2. **Expansion**: apply one untried ply to a copy of the node's state.
//! 3. **Simulation**: play the copy out with a rollout policy, up to a ply
//!    cutoff.
//! 4. **Backpropagation**: add the result to every node back to the root.
//!
//! The final answer is the root action with the most visits.

pub mod board;
pub mod config;
pub mod game_state;
pub mod mcts;
pub mod player;
pub mod policy;
pub mod stats;
pub mod tree;

pub use config::PlannerConfig;
pub use game_state::{roll_die, Action, ExtraTurnPolicy, GameState, MoveReport};
pub use mcts::{choose_blue_move, choose_move, ActionStats, MCTS};
pub use player::Color;
pub use policy::{RolloutPolicy, SelectionPolicy};
pub use stats::SearchStatistics;
pub use tree::{NodeId, Ply, SearchNode, SearchTree};

/// Error types for the engine and the planner
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LudoError {
    /// The action is not legal in the current state, or names a token that
    /// does not exist
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// A caller-supplied value is out of range, or the position handed to
    /// the planner leaves the player to move nothing to plan for
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for engine and planner operations
pub type Result<T> = std::result::Result<T, LudoError>;
