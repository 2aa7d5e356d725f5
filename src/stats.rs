//! Search statistics
//!
//! One [`SearchStatistics`] is filled per call to
//! [`MCTS::search`](crate::MCTS::search). Besides the tree's size and depth it
//! tracks how the rollouts ended. Many cut-off rollouts mean the root values
//! are pulled towards the 0.5 draw reward, and `max_rollout_plies` should be
//! raised.

use std::time::Duration;

/// Counters gathered by one planner search
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Simulations completed; each one added a node and played a rollout
    pub simulations: usize,

    /// Wall-clock time of the search
    pub total_time: Duration,

    /// Nodes in the tree, root included
    pub tree_size: usize,

    /// Deepest ply reached below the root
    pub max_depth: usize,

    /// Plies played across all rollouts, passes included
    pub rollout_plies: usize,

    /// Rollouts scored as draws because they hit the ply cutoff
    pub truncated_rollouts: usize,

    /// Set when `max_time` ran out before `n_simulations`
    pub stopped_early: bool,
}

impl SearchStatistics {
    /// Statistics for a tree that holds only its root
    pub fn new() -> Self {
        SearchStatistics {
            tree_size: 1,
            ..Default::default()
        }
    }

    /// Mean cost of one simulation in microseconds
    pub fn avg_time_per_simulation_us(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.simulations as f64
    }

    pub fn simulations_per_second(&self) -> f64 {
        let seconds = self.total_time.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.simulations as f64 / seconds
    }

    /// Mean rollout length in plies
    pub fn avg_rollout_plies(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.rollout_plies as f64 / self.simulations as f64
    }

    /// Share of rollouts that ended at the cutoff instead of with a winner
    pub fn truncated_fraction(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.truncated_rollouts as f64 / self.simulations as f64
    }

    /// Multi-line report, logged at debug level after every search
    pub fn summary(&self) -> String {
        format!(
            "Planner Search Statistics:\n\
             - Simulations: {}{}\n\
             - Total time: {:.3} seconds ({:.1} simulations/s, {:.3} µs each)\n\
             - Tree: {} nodes, {} plies deep\n\
             - Rollouts: {:.1} plies on average, {} cut off ({:.1}%)",
            self.simulations,
            if self.stopped_early {
                " (stopped by time limit)"
            } else {
                ""
            },
            self.total_time.as_secs_f64(),
            self.simulations_per_second(),
            self.avg_time_per_simulation_us(),
            self.tree_size,
            self.max_depth,
            self.avg_rollout_plies(),
            self.truncated_rollouts,
            self.truncated_fraction() * 100.0,
        )
    }
}
