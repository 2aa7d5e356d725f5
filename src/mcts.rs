//! Main implementation of the Monte Carlo Tree Search planner
//!
//! This module orchestrates the four phases of selection, expansion,
//! simulation and backpropagation over a [`SearchTree`] of game states.
//!
//! Dice are part of the tree walk rather than separate chance nodes: at
//! every node a roll is drawn first, and only the plies legal for that roll
//! are considered. A node counts as fully expanded for a roll once each of
//! those plies has a child.

use std::time::Instant;

use log::{debug, trace, warn};
use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

use crate::{
    config::{BestChildCriteria, PlannerConfig},
    game_state::{roll_die, Action, GameState},
    player::Color,
    policy::{
        selection::{SelectionPolicy, UCB1Policy},
        simulation::{playout, Playout, RandomRollout, RolloutPolicy},
    },
    stats::SearchStatistics,
    tree::{NodeId, Ply, SearchNode, SearchTree, ROOT},
    LudoError, Result,
};

/// Search results for one root action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionStats {
    pub action: Action,
    pub visits: u64,
    /// Mean reward for the searching player
    pub value: f64,
}

/// The Monte Carlo Tree Search planner
///
/// Rewards are kept from the point of view of the player to move at the
/// root: 1.0 for a win, 0.0 for a loss and 0.5 for a rollout cut off before
/// the game ended.
pub struct MCTS {
    /// The search tree; rebuilt from its root state by every search
    tree: SearchTree,

    /// Configuration for the search
    config: PlannerConfig,

    /// Player the search optimises for
    perspective: Color,

    /// Die face already rolled at the root, if known
    root_roll: Option<u8>,

    /// Statistics gathered during search
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy>,

    /// Policy for choosing moves during the simulation phase
    rollout_policy: Box<dyn RolloutPolicy>,
}

impl MCTS {
    /// Creates a planner for `root_state`.
    ///
    /// If the configuration names an extra-turn policy it replaces the one
    /// carried by `root_state`.
    pub fn new(mut root_state: GameState, config: PlannerConfig) -> Self {
        if let Some(policy) = config.extra_turn_policy {
            root_state.set_extra_turn_policy(policy);
        }

        let perspective = root_state.current_player();
        let selection_policy: Box<dyn SelectionPolicy> =
            Box::new(UCB1Policy::new(config.exploration_constant));

        MCTS {
            tree: SearchTree::new(root_state),
            config,
            perspective,
            root_roll: None,
            statistics: SearchStatistics::new(),
            selection_policy,
            rollout_policy: Box::new(RandomRollout::new()),
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the rollout policy to use
    pub fn with_rollout_policy<P: RolloutPolicy + 'static>(mut self, policy: P) -> Self {
        self.rollout_policy = Box::new(policy);
        self
    }

    /// Plans for a die that has already been rolled.
    ///
    /// Without a root roll the planner also samples the root's die, and the
    /// returned action is the most promising one over all faces.
    pub fn with_root_roll(mut self, roll: u8) -> Self {
        self.root_roll = Some(roll);
        self
    }

    /// The player the search optimises for
    pub fn perspective(&self) -> Color {
        self.perspective
    }

    /// The tree built by the last search
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Runs the search with a random source seeded from the configuration
    /// (or from entropy when no seed is configured) and returns the best
    /// action.
    pub fn search(&mut self) -> Result<Action> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.search_with_rng(&mut rng)
    }

    /// Runs the search drawing every die roll and rollout choice from `rng`
    pub fn search_with_rng<R: RngCore>(&mut self, rng: &mut R) -> Result<Action> {
        self.config.validate()?;
        self.check_root()?;

        self.tree = SearchTree::new(self.tree.root().state.clone());
        self.statistics = SearchStatistics::new();

        let start_time = Instant::now();

        for i in 0..self.config.n_simulations {
            if let Some(max_duration) = self.config.max_time {
                if start_time.elapsed() >= max_duration {
                    self.statistics.stopped_early = true;
                    debug!("search stopped after {} simulations due to time limit", i);
                    break;
                }
            }

            self.execute_iteration(&mut *rng)?;
            self.statistics.simulations = i + 1;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = self.tree.len();
        debug!("{}", self.statistics.summary());

        self.select_best_action()
    }

    /// Execute a single iteration of MCTS
    fn execute_iteration(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        // 1. Selection phase
        let (selected, untried) = self.selection(rng);

        // 2. Expansion phase
        let leaf = self.expansion(selected, &untried, rng)?;

        // 3. Simulation phase
        let result = self.simulation(leaf, rng)?;

        // 4. Backpropagation phase
        self.backpropagation(leaf, result.reward);

        Ok(())
    }

    /// Selection phase: descend until a node has an untried ply for the
    /// drawn roll, is terminal, or sits at the depth limit.
    ///
    /// Returns the node together with its untried plies.
    fn selection(&mut self, rng: &mut dyn RngCore) -> (NodeId, Vec<Ply>) {
        let mut current = ROOT;

        loop {
            let node = self.tree.node(current);
            let at_depth_limit = self
                .config
                .max_depth
                .is_some_and(|max_depth| node.depth >= max_depth);
            if node.state.is_terminal() || at_depth_limit {
                return (current, Vec::new());
            }

            let roll = match self.root_roll {
                Some(roll) if current == ROOT => roll,
                _ => roll_die(rng),
            };

            let mut untried = Vec::new();
            let mut candidates = Vec::new();
            for ply in Ply::legal(&node.state, roll) {
                match self.tree.child_for(current, &ply) {
                    Some(child) => candidates.push(child),
                    None => untried.push(ply),
                }
            }

            if !untried.is_empty() {
                return (current, untried);
            }

            let candidate_nodes: Vec<&SearchNode> =
                candidates.iter().map(|&id| self.tree.node(id)).collect();
            let choice = self
                .selection_policy
                .select_child(node, &candidate_nodes, self.perspective);

            current = candidates[choice];
            let depth = self.tree.node(current).depth;
            self.statistics.max_depth = self.statistics.max_depth.max(depth);
        }
    }

    /// Expansion phase: add a child for one randomly chosen untried ply
    fn expansion(
        &mut self,
        node: NodeId,
        untried: &[Ply],
        rng: &mut dyn RngCore,
    ) -> Result<NodeId> {
        let Some(&ply) = untried.choose(rng) else {
            return Ok(node);
        };

        let child = self.tree.expand(node, ply)?;
        let depth = self.tree.node(child).depth;
        trace!("expanded {} at depth {}", ply, depth);

        self.statistics.tree_size = self.tree.len();
        self.statistics.max_depth = self.statistics.max_depth.max(depth);

        Ok(child)
    }

    /// Simulation phase: play out a copy of the node's state
    fn simulation(&mut self, node: NodeId, rng: &mut dyn RngCore) -> Result<Playout> {
        let state = self.tree.node(node).state.clone();
        let result = playout(
            state,
            self.rollout_policy.as_ref(),
            self.perspective,
            self.config.max_rollout_plies,
            rng,
        )?;

        self.statistics.rollout_plies += result.plies;
        if result.truncated {
            self.statistics.truncated_rollouts += 1;
        }

        Ok(result)
    }

    /// Backpropagation phase: credit `reward` to every node from `leaf` up
    /// to the root.
    ///
    /// Rewards stay in the searching player's terms at every depth, so node
    /// means remain in `[0, 1]` and selection can mirror them for the
    /// opponent.
    fn backpropagation(&self, leaf: NodeId, reward: f64) {
        for node in self.tree.ancestors(leaf) {
            node.record(reward);
        }
    }

    /// Rejects roots the search cannot plan for: finished games, positions
    /// where no die face gives the player to move an action, and pinned
    /// rolls outside `1..=6` or without an action.
    fn check_root(&self) -> Result<()> {
        let state = &self.tree.root().state;
        let mover = state.current_player();
        if let Some(winner) = state.winner() {
            return Err(LudoError::InvalidArgument(format!(
                "{} has no legal move under any roll: {} has already won",
                mover, winner
            )));
        }

        match self.root_roll {
            Some(roll) if !(1..=6).contains(&roll) => Err(LudoError::InvalidArgument(format!(
                "root roll must be between 1 and 6, got {}",
                roll
            ))),
            Some(roll) if state.get_legal_actions(roll).is_empty() => {
                Err(LudoError::InvalidArgument(format!(
                    "{} has no legal move for a roll of {}",
                    mover, roll
                )))
            }
            Some(_) => Ok(()),
            None if state.has_any_move() => Ok(()),
            None => Err(no_move_under_any_roll(mover)),
        }
    }

    /// Statistics for every root action explored by the last search
    pub fn root_action_stats(&self) -> Vec<ActionStats> {
        self.tree
            .root()
            .children
            .iter()
            .filter_map(|&id| {
                let node = self.tree.node(id);
                let action = node.ply?.action()?;
                Some(ActionStats {
                    action,
                    visits: node.visits(),
                    value: node.value(),
                })
            })
            .collect()
    }

    /// Selects the best action based on configured criteria
    fn select_best_action(&self) -> Result<Action> {
        let mut best: Option<(Action, f64)> = None;

        for stats in self.root_action_stats() {
            let score = match self.config.best_child_criteria {
                BestChildCriteria::MostVisits => stats.visits as f64,
                BestChildCriteria::HighestValue => stats.value,
            };
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((stats.action, score));
            }
        }

        match best {
            Some((action, _)) => Ok(action),
            None => self.fallback_action(),
        }
    }

    /// First legal action of the lowest roll that has one, used when the
    /// budget ran out before any move was expanded at the root
    fn fallback_action(&self) -> Result<Action> {
        let state = &self.tree.root().state;
        let rolls = match self.root_roll {
            Some(roll) => roll..=roll,
            None => 1..=6,
        };

        let action = rolls
            .into_iter()
            .find_map(|roll| state.get_legal_actions(roll).first().copied())
            .ok_or_else(|| no_move_under_any_roll(state.current_player()))?;

        warn!("no root move was expanded, falling back to {}", action);
        Ok(action)
    }

    /// Returns a visualization of the search tree down to `max_depth`
    pub fn visualize_tree(&self, max_depth: usize) -> String {
        let mut result = String::new();
        self.visualize_node(ROOT, max_depth, &mut result);
        result
    }

    /// Helper method to visualize a node and its children
    fn visualize_node(&self, id: NodeId, max_depth: usize, output: &mut String) {
        let node = self.tree.node(id);
        let indent = "  ".repeat(node.depth);
        let ply_str = match &node.ply {
            Some(ply) => ply.to_string(),
            None => "Root".to_string(),
        };

        output.push_str(&format!(
            "{}{} (visits: {}, value: {:.3})\n",
            indent,
            ply_str,
            node.visits(),
            node.value()
        ));

        if node.depth < max_depth {
            for &child in &node.children {
                self.visualize_node(child, max_depth, output);
            }
        }
    }
}

/// Runs a search from `state` for the player to move and returns the
/// chosen action.
pub fn choose_move(state: &GameState, config: &PlannerConfig) -> Result<Action> {
    MCTS::new(state.clone(), config.clone()).search()
}

/// Chooses Blue's move with `n_simulations` simulations and default settings.
///
/// Fails with [`LudoError::InvalidArgument`] if Red is to move, the budget
/// is zero, the game is over, or Blue cannot move whatever the roll.
pub fn choose_blue_move(state: &GameState, n_simulations: usize) -> Result<Action> {
    if state.current_player() != Color::Blue {
        return Err(LudoError::InvalidArgument(format!(
            "choose_blue_move called with {} to move",
            state.current_player()
        )));
    }

    let config = PlannerConfig::default().with_n_simulations(n_simulations);
    choose_move(state, &config)
}

fn no_move_under_any_roll(mover: Color) -> LudoError {
    LudoError::InvalidArgument(format!("{} has no legal move under any roll", mover))
}
