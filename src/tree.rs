//! Tree data structures for Monte Carlo Tree Search
//!
//! Nodes live in a flat arena owned by [`SearchTree`]. Children are listed by
//! [`NodeId`] and every node keeps the id of its parent, so backpropagation
//! can walk upwards without the tree holding any reference cycles.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    game_state::{Action, GameState},
    Result,
};

/// Index of a node inside a [`SearchTree`]
pub type NodeId = usize;

/// Id of the root node
pub const ROOT: NodeId = 0;

/// Label of the edge between a node and one of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ply {
    /// The side to move played an action
    Move(Action),

    /// The side to move had no legal action for the roll and passed
    Pass,
}

impl Ply {
    /// The plies available in `state` once `dice_roll` is known.
    ///
    /// Never empty: a roll without legal moves yields a single [`Ply::Pass`].
    pub fn legal(state: &GameState, dice_roll: u8) -> Vec<Ply> {
        let actions = state.get_legal_actions(dice_roll);
        if actions.is_empty() {
            vec![Ply::Pass]
        } else {
            actions.into_iter().map(Ply::Move).collect()
        }
    }

    /// The action behind this ply, if it is a move
    pub fn action(&self) -> Option<Action> {
        match self {
            Ply::Move(action) => Some(*action),
            Ply::Pass => None,
        }
    }
}

impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ply::Move(action) => write!(f, "{}", action),
            Ply::Pass => write!(f, "pass"),
        }
    }
}

/// Represents a node in the MCTS tree
///
/// Each node owns its game state. Rewards are accumulated from the
/// perspective of the player the search is run for.
pub struct SearchNode {
    /// The game state at this node
    pub state: GameState,

    /// The ply that led to this state (None for root)
    pub ply: Option<Ply>,

    /// Parent node (None for root). Lookup only; the arena owns every node.
    pub parent: Option<NodeId>,

    /// Children in creation order
    pub children: Vec<NodeId>,

    /// Number of times this node has been visited
    /// Uses atomic operations so the counters can be shared between workers
    pub visits: AtomicU64,

    /// Total reward accumulated from simulations through this node
    /// Uses atomic operations and fixed-point representation internally
    pub total_reward: AtomicU64,

    /// Depth of this node in the tree (root = 0)
    pub depth: usize,
}

/// Internal representation of a fixed-point value for rewards
/// This allows atomic operations on floating point rewards
const REWARD_SCALE: f64 = 1_000_000.0;

/// Safely convert a floating point reward to a scaled integer
fn float_to_scaled_u64(value: f64) -> u64 {
    ((value * REWARD_SCALE).max(0.0) as u64).min(u64::MAX / 2)
}

/// Safely convert a scaled integer back to a floating point reward
fn scaled_u64_to_float(value: u64) -> f64 {
    value as f64 / REWARD_SCALE
}

impl SearchNode {
    fn new(state: GameState, ply: Option<Ply>, parent: Option<NodeId>, depth: usize) -> Self {
        SearchNode {
            state,
            ply,
            parent,
            children: Vec::new(),
            visits: AtomicU64::new(0),
            total_reward: AtomicU64::new(0),
            depth,
        }
    }

    /// Returns the number of visits to this node
    pub fn visits(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }

    /// Returns the total reward accumulated at this node
    pub fn total_reward(&self) -> f64 {
        scaled_u64_to_float(self.total_reward.load(Ordering::Relaxed))
    }

    /// Returns the average reward (value) of this node
    pub fn value(&self) -> f64 {
        let visits = self.visits();
        if visits == 0 {
            return 0.0;
        }
        self.total_reward() / visits as f64
    }

    /// Increments the visit count
    pub fn increment_visits(&self) {
        self.visits.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds reward to the total
    pub fn add_reward(&self, reward: f64) {
        self.total_reward
            .fetch_add(float_to_scaled_u64(reward), Ordering::Relaxed);
    }

    /// Counts one simulation through this node that scored `reward` for the
    /// searching player
    pub fn record(&self, reward: f64) {
        self.increment_visits();
        self.add_reward(reward);
    }
}

impl fmt::Debug for SearchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchNode")
            .field("ply", &self.ply)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("visits", &self.visits())
            .field("value", &self.value())
            .field("depth", &self.depth)
            .finish()
    }
}

/// Arena holding every node of one search
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Creates a tree containing only the root
    pub fn new(root_state: GameState) -> Self {
        SearchTree {
            nodes: vec![SearchNode::new(root_state, None, None, 0)],
        }
    }

    pub fn root(&self) -> &SearchNode {
        &self.nodes[ROOT]
    }

    /// Returns the node with the given id
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The child of `parent` reached through `ply`, if it has been expanded
    pub fn child_for(&self, parent: NodeId, ply: &Ply) -> Option<NodeId> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].ply.as_ref() == Some(ply))
    }

    /// Creates the child of `parent` reached through `ply`.
    ///
    /// The child's state is a copy of the parent's with the ply applied; the
    /// parent's state is not touched.
    pub fn expand(&mut self, parent: NodeId, ply: Ply) -> Result<NodeId> {
        let parent_node = &self.nodes[parent];
        let mut state = parent_node.state.clone();
        match ply {
            Ply::Move(action) => {
                state.apply_action(action)?;
            }
            Ply::Pass => state.pass_turn(),
        }

        let id = self.nodes.len();
        let depth = parent_node.depth + 1;
        self.nodes
            .push(SearchNode::new(state, Some(ply), Some(parent), depth));
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Iterates from `id` up to and including the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }
}

/// Iterator returned by [`SearchTree::ancestors`]
pub struct Ancestors<'a> {
    tree: &'a SearchTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a SearchNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node(self.next?);
        self.next = node.parent;
        Some(node)
    }
}
