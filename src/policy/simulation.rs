//! Rollout policies for the MCTS algorithm
//!
//! A rollout policy picks one move for a given state and die roll. The
//! [`playout`] driver uses it to advance a copy of a state until the game
//! ends or the ply cutoff is reached.

use rand::{distributions::WeightedIndex, prelude::Distribution, seq::SliceRandom, RngCore};

use crate::{
    game_state::{roll_die, Action, GameState},
    player::Color,
    Result,
};

/// Reward credited to a playout that hits the ply cutoff
pub const DRAW_REWARD: f64 = 0.5;

/// Trait for policies that choose moves during simulation
pub trait RolloutPolicy: Send + Sync {
    /// Picks one of `state.get_legal_actions(dice_roll)`, or `None` to pass
    /// when there is nothing to play.
    fn select_move(&self, state: &GameState, dice_roll: u8, rng: &mut dyn RngCore)
        -> Option<Action>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn RolloutPolicy>;
}

/// Uniform random rollout policy
///
/// Every legal move is equally likely.
#[derive(Debug, Clone)]
pub struct RandomRollout;

impl RandomRollout {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomRollout
    }
}

impl Default for RandomRollout {
    fn default() -> Self {
        Self::new()
    }
}

impl RolloutPolicy for RandomRollout {
    fn select_move(
        &self,
        state: &GameState,
        dice_roll: u8,
        rng: &mut dyn RngCore,
    ) -> Option<Action> {
        state.get_legal_actions(dice_roll).choose(rng).copied()
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy> {
        Box::new(self.clone())
    }
}

/// Weighted rollout policy
///
/// Samples legal moves in proportion to a caller-supplied weight. Negative
/// and non-finite weights count as zero; if nothing has positive weight the
/// choice is uniform.
#[derive(Clone)]
pub struct HeuristicRollout<F>
where
    F: Fn(&GameState, &Action) -> f64 + Clone + Send + Sync + 'static,
{
    weight: F,
}

impl<F> HeuristicRollout<F>
where
    F: Fn(&GameState, &Action) -> f64 + Clone + Send + Sync + 'static,
{
    /// Creates a new heuristic policy with the given weight function
    pub fn new(weight: F) -> Self {
        HeuristicRollout { weight }
    }
}

impl HeuristicRollout<fn(&GameState, &Action) -> f64> {
    /// A policy that favours captures, finishing moves and leaving home
    pub fn aggressive() -> Self {
        HeuristicRollout::new(aggressive_weight as fn(&GameState, &Action) -> f64)
    }
}

impl<F> std::fmt::Debug for HeuristicRollout<F>
where
    F: Fn(&GameState, &Action) -> f64 + Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicRollout").finish_non_exhaustive()
    }
}

impl<F> RolloutPolicy for HeuristicRollout<F>
where
    F: Fn(&GameState, &Action) -> f64 + Clone + Send + Sync + 'static,
{
    fn select_move(
        &self,
        state: &GameState,
        dice_roll: u8,
        rng: &mut dyn RngCore,
    ) -> Option<Action> {
        let actions = state.get_legal_actions(dice_roll);
        if actions.len() <= 1 {
            return actions.first().copied();
        }

        let weights = actions.iter().map(|action| {
            let w = (self.weight)(state, action);
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        });

        match WeightedIndex::new(weights) {
            Ok(distribution) => Some(actions[distribution.sample(rng)]),
            // All weights zero
            Err(_) => actions.choose(rng).copied(),
        }
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy> {
        Box::new(self.clone())
    }
}

/// Weight used by [`HeuristicRollout::aggressive`]
pub fn aggressive_weight(state: &GameState, action: &Action) -> f64 {
    use crate::board::{absolute_cell, FINISHED, HOME};

    let mover = state.current_player();
    let opponent = mover.opponent();
    let position = state.tokens(mover)[action.token_index];

    let captures = absolute_cell(mover, action.target).is_some_and(|cell| {
        state
            .tokens(opponent)
            .iter()
            .any(|&p| absolute_cell(opponent, p) == Some(cell))
    });

    let mut weight = 1.0;
    if captures {
        weight += 4.0;
    }
    if action.target == FINISHED {
        weight += 3.0;
    }
    if position == HOME {
        weight += 2.0;
    }
    weight
}

// Implement RolloutPolicy for Box<dyn RolloutPolicy>
impl RolloutPolicy for Box<dyn RolloutPolicy> {
    fn select_move(
        &self,
        state: &GameState,
        dice_roll: u8,
        rng: &mut dyn RngCore,
    ) -> Option<Action> {
        (**self).select_move(state, dice_roll, rng)
    }

    fn clone_box(&self) -> Box<dyn RolloutPolicy> {
        (**self).clone_box()
    }
}

/// Outcome of one simulated game continuation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playout {
    /// Reward from the requested perspective: 1.0 win, 0.0 loss,
    /// [`DRAW_REWARD`] when truncated
    pub reward: f64,

    /// Number of plies played, passes included
    pub plies: usize,

    /// Whether the ply cutoff ended the playout
    pub truncated: bool,
}

/// Plays `state` forward with `policy` until the game ends or `max_plies`
/// plies have been played.
///
/// The state is consumed; callers pass a clone when they need to keep the
/// original.
pub fn playout(
    mut state: GameState,
    policy: &dyn RolloutPolicy,
    perspective: Color,
    max_plies: usize,
    rng: &mut dyn RngCore,
) -> Result<Playout> {
    let mut plies = 0;

    while plies < max_plies {
        if let Some(winner) = state.winner() {
            return Ok(Playout {
                reward: reward_for(winner, perspective),
                plies,
                truncated: false,
            });
        }

        let roll = roll_die(rng);
        match policy.select_move(&state, roll, rng) {
            Some(action) => {
                state.apply_action(action)?;
            }
            None => state.pass_turn(),
        }
        plies += 1;
    }

    Ok(match state.winner() {
        Some(winner) => Playout {
            reward: reward_for(winner, perspective),
            plies,
            truncated: false,
        },
        None => Playout {
            reward: DRAW_REWARD,
            plies,
            truncated: true,
        },
    })
}

/// Reward of a finished game for `perspective`
pub fn reward_for(winner: Color, perspective: Color) -> f64 {
    if winner == perspective {
        1.0
    } else {
        0.0
    }
}
