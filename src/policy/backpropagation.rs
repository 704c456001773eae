//! How a playout result is recorded on the path back to the root
//!
//! The driver converts the playout score into each node's own perspective
//! before calling the policy, so a policy only decides what to store.

use crate::{game_state::GameState, tree::MCTSNode};

/// Records a reward on one node of the selected path
pub trait BackpropagationPolicy<S: GameState>: Send + Sync {
    /// Records `reward`, already expressed for the node's mover
    fn update_stats(&self, node: &MCTSNode<S>, reward: f64);
}

/// Counts the visit and accumulates the reward
#[derive(Debug, Clone, Default)]
pub struct StandardPolicy;

impl StandardPolicy {
    pub fn new() -> Self {
        StandardPolicy
    }
}

impl<S: GameState> BackpropagationPolicy<S> for StandardPolicy {
    fn update_stats(&self, node: &MCTSNode<S>, reward: f64) {
        node.increment_visits();
        node.add_reward(reward);
    }
}

impl<S: GameState> BackpropagationPolicy<S> for Box<dyn BackpropagationPolicy<S>> {
    fn update_stats(&self, node: &MCTSNode<S>, reward: f64) {
        (**self).update_stats(node, reward)
    }
}
