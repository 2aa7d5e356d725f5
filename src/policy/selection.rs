//! Selection policies for the MCTS algorithm
//!
//! Selection policies determine which child to descend into during the
//! selection phase of MCTS, balancing exploration and exploitation.

use std::f64;

use crate::{player::Color, tree::SearchNode};

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy: Send + Sync {
    /// Selects one of `candidates`, all children of `parent`, and returns
    /// its index in `candidates`.
    ///
    /// Node rewards are stored from `perspective`'s point of view; the player
    /// acting at `parent` may be the opponent.
    fn select_child(&self, parent: &SearchNode, candidates: &[&SearchNode], perspective: Color)
        -> usize;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// This is the classic selection policy for MCTS:
///
/// ```text
/// UCB1 = average_reward + exploration_constant * sqrt(ln(parent_visits) / child_visits)
/// ```
///
/// `average_reward` is taken from the point of view of the player choosing
/// at the parent, so the opponent minimises the searching player's reward.
/// The first candidate wins ties.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited nodes.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value for a node
    pub fn ucb1_value(&self, child_value: f64, child_visits: u64, parent_visits: u64) -> f64 {
        if child_visits == 0 {
            return f64::INFINITY; // Always explore nodes that have never been visited
        }

        let exploitation = child_value;
        let exploration =
            self.exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt();

        exploitation + exploration
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl SelectionPolicy for UCB1Policy {
    fn select_child(
        &self,
        parent: &SearchNode,
        candidates: &[&SearchNode],
        perspective: Color,
    ) -> usize {
        let parent_visits = parent.visits();
        let chooser_is_perspective = parent.state.current_player() == perspective;

        let mut best_value = f64::NEG_INFINITY;
        let mut best_index = 0;

        for (i, child) in candidates.iter().enumerate() {
            let mean = if chooser_is_perspective {
                child.value()
            } else {
                1.0 - child.value()
            };

            let ucb_value = self.ucb1_value(mean, child.visits(), parent_visits);

            if ucb_value > best_value {
                best_value = ucb_value;
                best_index = i;
            }
        }

        best_index
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl SelectionPolicy for Box<dyn SelectionPolicy> {
    fn select_child(
        &self,
        parent: &SearchNode,
        candidates: &[&SearchNode],
        perspective: Color,
    ) -> usize {
        (**self).select_child(parent, candidates, perspective)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        (**self).clone_box()
    }
}
