//! The MCTS search tree
//!
//! Nodes live in a single arena and refer to each other through [`NodeId`]
//! handles. A parent link is just a handle, so walking back to the root needs
//! no back-pointers, and discarding a tree releases every node at once.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{board::Side, game_state::GameState};

/// Handle of a node inside a [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root is always the first node allocated
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One position in the search tree
///
/// Statistics are kept in atomics so a back-propagation step is an
/// indivisible read-modify-write even when several workers share a tree.
pub struct MCTSNode<S: GameState> {
    pub state: S,

    /// `None` only for the root
    pub parent: Option<NodeId>,

    /// Expanded children, in the order they were expanded
    pub children: Vec<NodeId>,

    /// Successor states not yet expanded, stored in reverse enumeration order
    /// so the next one to expand is at the end
    pub unexpanded: Vec<S>,

    pub visits: AtomicU64,

    /// Sum of rewards in millionths
    pub total_reward: AtomicU64,

    /// Plies below the root
    pub depth: usize,

    /// Side that made the move leading to this node. Rewards are stored from
    /// this side's perspective.
    pub mover: Side,
}

/// Rewards live in `[0, 1]` and are summed as fixed-point integers so they can
/// be added atomically
const REWARD_SCALE: f64 = 1_000_000.0;

fn to_fixed(reward: f64) -> u64 {
    (reward.clamp(0.0, 1.0) * REWARD_SCALE).round() as u64
}

fn from_fixed(scaled: u64) -> f64 {
    scaled as f64 / REWARD_SCALE
}

impl<S: GameState> MCTSNode<S> {
    /// Creates an unvisited node for `state`
    pub fn new(state: S, parent: Option<NodeId>, mover: Side, depth: usize) -> Self {
        let mut unexpanded = state.legal_moves();
        unexpanded.reverse();

        MCTSNode {
            state,
            parent,
            children: Vec::new(),
            unexpanded,
            visits: AtomicU64::new(0),
            total_reward: AtomicU64::new(0),
            depth,
            mover,
        }
    }

    pub fn visits(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }

    /// Sum of the rewards recorded here, from the mover's perspective
    pub fn total_reward(&self) -> f64 {
        from_fixed(self.total_reward.load(Ordering::Relaxed))
    }

    /// Mean reward for the mover; zero while unvisited
    pub fn value(&self) -> f64 {
        match self.visits() {
            0 => 0.0,
            n => self.total_reward() / n as f64,
        }
    }

    pub fn increment_visits(&self) {
        self.visits.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `reward`, clamped to `[0, 1]`
    pub fn add_reward(&self, reward: f64) {
        self.total_reward
            .fetch_add(to_fixed(reward), Ordering::Relaxed);
    }

    /// True once every legal successor has a child node
    pub fn is_fully_expanded(&self) -> bool {
        self.unexpanded.is_empty()
    }

    /// True while no child has been expanded
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True if the node's state ends the game
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty() && self.unexpanded.is_empty()
    }
}

/// Arena holding every node of one search
pub struct SearchTree<S: GameState> {
    nodes: Vec<MCTSNode<S>>,
}

impl<S: GameState> SearchTree<S> {
    /// Creates a tree holding only the root
    pub fn new(root_state: S) -> Self {
        let mover = root_state.to_move().opponent();
        SearchTree {
            nodes: vec![MCTSNode::new(root_state, None, mover, 0)],
        }
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node behind a handle
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    pub fn get(&self, id: NodeId) -> &MCTSNode<S> {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds no nodes, which never happens after `new` or `reset`
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expands the next unexpanded successor of `id`, in enumeration order.
    ///
    /// Returns `None` if the node is already fully expanded.
    pub fn expand(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = &mut self.nodes[id.index()];
        let next_state = parent.unexpanded.pop()?;
        let mover = parent.state.to_move();
        let depth = parent.depth + 1;

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes[id.index()].children.push(child_id);
        self.nodes
            .push(MCTSNode::new(next_state, Some(id), mover, depth));
        Some(child_id)
    }

    /// Handles from `id` up to and including the root
    pub fn path_to_root(&self, id: NodeId) -> PathToRoot<'_, S> {
        PathToRoot {
            tree: self,
            next: Some(id),
        }
    }

    /// Replaces the whole tree with a fresh root, releasing every node
    pub fn reset(&mut self, root_state: S) {
        self.nodes.clear();
        let mover = root_state.to_move().opponent();
        self.nodes.push(MCTSNode::new(root_state, None, mover, 0));
    }
}

/// Iterator over the ancestors of a node, starting with the node itself
pub struct PathToRoot<'a, S: GameState> {
    tree: &'a SearchTree<S>,
    next: Option<NodeId>,
}

impl<'a, S: GameState> Iterator for PathToRoot<'a, S> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).parent;
        Some(current)
    }
}
