//! Policies for different phases of the MCTS algorithm
//!
//! - Selection policies: how to choose which child to descend into
//! - Rollout policies: how to play out games from a node

pub mod selection;
pub mod simulation;

pub use selection::{SelectionPolicy, UCB1Policy};
pub use simulation::{playout, HeuristicRollout, Playout, RandomRollout, RolloutPolicy};
