//! Tree descent: which child an iteration walks into

use crate::{
    game_state::GameState,
    tree::{NodeId, SearchTree},
    utils,
};

/// Chooses the child to descend into
pub trait SelectionPolicy<S: GameState>: Send + Sync {
    /// Selects a child of `node`, or `None` if it has no children.
    ///
    /// Ties must resolve to the earliest child so a search is reproducible.
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId>;
}

/// Picks the child with the largest [`utils::ucb1_value`]
///
/// Child rewards are stored for the side that moved into the child, which is
/// the side choosing at the parent, so no sign flip is needed here.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// `c` in the bound
    pub exploration_constant: f64,
}

impl UCB1Policy {
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(1.414)
    }
}

impl<S: GameState> SelectionPolicy<S> for UCB1Policy {
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId> {
        let parent = tree.get(node);
        let parent_visits = parent.visits();
        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in &parent.children {
            let child = tree.get(child_id);
            let score = utils::ucb1_value(
                child.total_reward(),
                child.visits(),
                parent_visits,
                self.exploration_constant,
            );

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }
}

impl<S: GameState> SelectionPolicy<S> for Box<dyn SelectionPolicy<S>> {
    fn select_child(&self, tree: &SearchTree<S>, node: NodeId) -> Option<NodeId> {
        (**self).select_child(tree, node)
    }
}
