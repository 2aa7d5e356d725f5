//! Configuration options for the planner
//!
//! This module defines the parameters that control the search budget, the
//! exploration/exploitation balance and the rule variant the search plays
//! under.

use std::time::Duration;

use crate::{game_state::ExtraTurnPolicy, LudoError, Result};

/// Criteria for selecting the best child after search is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Select the child with the most visits
    ///
    /// Robust to noisy value estimates, since visit counts only grow where
    /// the value stayed competitive.
    MostVisits,

    /// Select the child with the highest average reward
    HighestValue,
}

/// Configuration for the planner
///
/// # Example
///
/// ```
/// use ludo_mcts::{config::BestChildCriteria, ExtraTurnPolicy, PlannerConfig};
/// use std::time::Duration;
///
/// let config = PlannerConfig::default()
///     .with_n_simulations(5_000)
///     .with_exploration_constant(1.0)
///     .with_max_rollout_plies(300)
///     .with_extra_turn_policy(ExtraTurnPolicy::OnSix)
///     .with_max_time(Duration::from_millis(500))
///     .with_best_child_criteria(BestChildCriteria::MostVisits)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Number of simulations to run
    ///
    /// The main search budget; more simulations give better estimates at a
    /// linear cost in time.
    pub n_simulations: usize,

    /// Exploration constant for UCB1
    ///
    /// Higher values favor exploration of less-visited nodes.
    /// The standard value is sqrt(2).
    pub exploration_constant: f64,

    /// Maximum number of plies a single rollout may play
    ///
    /// Rollouts that hit the cutoff are scored as draws.
    pub max_rollout_plies: usize,

    /// Rule variant to search under
    ///
    /// When set, overrides the extra-turn policy carried by the root state.
    pub extra_turn_policy: Option<ExtraTurnPolicy>,

    /// Maximum time to run the search
    ///
    /// Checked between simulations; the search stops early once exceeded.
    pub max_time: Option<Duration>,

    /// Maximum depth of the tree
    ///
    /// Nodes at this depth are simulated from but never expanded.
    pub max_depth: Option<usize>,

    /// Criteria for selecting the best child after search
    pub best_child_criteria: BestChildCriteria,

    /// Seed for the search's random source
    ///
    /// `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            n_simulations: 1_000,
            exploration_constant: std::f64::consts::SQRT_2,
            max_rollout_plies: 200,
            extra_turn_policy: None,
            max_time: None,
            max_depth: None,
            best_child_criteria: BestChildCriteria::MostVisits,
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Sets the number of simulations
    pub fn with_n_simulations(mut self, n_simulations: usize) -> Self {
        self.n_simulations = n_simulations;
        self
    }

    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the rollout ply cutoff
    pub fn with_max_rollout_plies(mut self, plies: usize) -> Self {
        self.max_rollout_plies = plies;
        self
    }

    /// Sets the extra-turn rule the search plays under
    pub fn with_extra_turn_policy(mut self, policy: ExtraTurnPolicy) -> Self {
        self.extra_turn_policy = Some(policy);
        self
    }

    /// Sets the maximum time to run the search
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    /// Sets the maximum depth of the tree
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the criteria for selecting the best child
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Seeds the search's random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every option is in range
    pub fn validate(&self) -> Result<()> {
        if self.n_simulations == 0 {
            return Err(LudoError::InvalidArgument(
                "n_simulations must be positive".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(LudoError::InvalidArgument(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.max_rollout_plies == 0 {
            return Err(LudoError::InvalidArgument(
                "max_rollout_plies must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
