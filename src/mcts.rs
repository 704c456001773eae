//! Monte Carlo Tree Search driver
//!
//! Each iteration walks the tree with the selection policy, grows it by one
//! node, scores that node with the simulation policy and records the score on
//! every ancestor. The root's most visited child is the decision.

use std::fmt::Write;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rand::RngCore;
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{BestChildCriteria, MCTSConfig},
    game_state::{GameState, Move},
    policy::{
        backpropagation::{BackpropagationPolicy, StandardPolicy},
        selection::{SelectionPolicy, UCB1Policy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    stats::SearchStatistics,
    tree::{MCTSNode, NodeId, SearchTree},
    utils, GameError, Result,
};

const ENGINE: &str = "mcts";

/// An MCTS engine bound to one position
///
/// Owns the search tree, the policies for each phase and the random source
/// consumed by playouts. Expansion order and tie-breaks are deterministic, so
/// two searches with equal seeds build identical trees.
pub struct MCTS<S: GameState, R: RngCore = ChaCha8Rng> {
    tree: SearchTree<S>,

    config: MCTSConfig,
    statistics: SearchStatistics,

    selection_policy: Box<dyn SelectionPolicy<S>>,
    simulation_policy: Box<dyn SimulationPolicy<S>>,
    backpropagation_policy: Box<dyn BackpropagationPolicy<S>>,

    /// Consumed only by playouts
    rng: R,
}

impl<S: GameState + 'static> MCTS<S, ChaCha8Rng> {
    /// Creates a new MCTS instance seeded from `config.seed`
    pub fn new(initial_state: S, config: MCTSConfig) -> Self {
        let rng = utils::seeded_rng(config.seed);
        Self::with_rng(initial_state, config, rng)
    }
}

impl<S: GameState + 'static, R: RngCore> MCTS<S, R> {
    /// Creates a new MCTS instance drawing randomness from `rng`
    pub fn with_rng(initial_state: S, config: MCTSConfig, rng: R) -> Self {
        let selection_policy: Box<dyn SelectionPolicy<S>> =
            Box::new(UCB1Policy::new(config.exploration_constant));

        let simulation_policy: Box<dyn SimulationPolicy<S>> = Box::new(RandomPolicy::new());

        let backpropagation_policy: Box<dyn BackpropagationPolicy<S>> =
            Box::new(StandardPolicy::new());

        MCTS {
            tree: SearchTree::new(initial_state),
            config,
            statistics: SearchStatistics::new(),
            selection_policy,
            simulation_policy,
            backpropagation_policy,
            rng,
        }
    }

    /// Replaces the UCB1 selection policy
    pub fn with_selection_policy<P: SelectionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Replaces the random playout policy
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Replaces the standard backpropagation policy
    pub fn with_backpropagation_policy<P: BackpropagationPolicy<S> + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.backpropagation_policy = Box::new(policy);
        self
    }

    /// Runs a search with the configured budget and returns the chosen
    /// successor state
    pub fn search(&mut self) -> Result<S> {
        self.search_for_iterations(self.config.max_iterations)
    }

    /// Runs a fresh search for the specified number of iterations
    ///
    /// At least one iteration always runs, so an exhausted time limit still
    /// yields a move.
    pub fn search_for_iterations(&mut self, iterations: usize) -> Result<S> {
        self.config.validate()?;
        if iterations == 0 {
            return Err(GameError::InvalidConfiguration(
                "a search needs at least one iteration".to_string(),
            ));
        }

        let root_state = self.tree.get(self.tree.root()).state.clone();
        if root_state.is_terminal() {
            return Err(GameError::TerminalState {
                engine: ENGINE.to_string(),
                key: root_state.key(),
            });
        }

        self.tree.reset(root_state);
        self.statistics = SearchStatistics::new();

        let started = Instant::now();
        let deadline = self.config.max_time;

        for done in 0..iterations {
            if done > 0 && deadline.map_or(false, |limit| started.elapsed() >= limit) {
                self.statistics.stopped_early = true;
                warn!("mcts hit its time limit after {} of {} iterations", done, iterations);
                break;
            }
            self.execute_iteration();
            self.statistics.iterations = done + 1;
        }

        self.statistics.total_time = started.elapsed();
        self.statistics.tree_size = self.tree.len();

        self.best_child()
    }

    /// Runs a search bounded by wall-clock time.
    ///
    /// The iteration budget still applies; time is checked between
    /// iterations so no playout is interrupted.
    pub fn search_for_time(&mut self, duration: Duration) -> Result<S> {
        let previous = self.config.max_time.replace(duration);
        let result = self.search();
        self.config.max_time = previous;
        result
    }

    fn execute_iteration(&mut self) {
        let selected = self.selection();
        let expanded = self.expansion(selected);
        let score = self
            .simulation_policy
            .simulate(&self.tree.get(expanded).state, &mut self.rng);
        self.backpropagation(expanded, score);
    }

    /// Selection phase: descend through fully expanded nodes
    fn selection(&mut self) -> NodeId {
        let mut current = self.tree.root();
        let mut depth = 0;

        loop {
            let node = self.tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                break;
            }
            match self.selection_policy.select_child(&self.tree, current) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => break,
            }
        }

        self.statistics.max_depth = self.statistics.max_depth.max(depth);
        current
    }

    /// Expansion phase: add the next unexplored successor, if any
    fn expansion(&mut self, node: NodeId) -> NodeId {
        match self.tree.expand(node) {
            Some(child) => {
                let depth = self.tree.get(child).depth;
                self.statistics.max_depth = self.statistics.max_depth.max(depth);
                child
            }
            None => node,
        }
    }

    /// Backpropagation phase: credit every node from `leaf` to the root, each
    /// from the perspective of the side that moved into it
    fn backpropagation(&mut self, leaf: NodeId, score_for_a: f64) {
        for id in self.tree.path_to_root(leaf) {
            let node = self.tree.get(id);
            let reward = utils::reward_for(node.mover, score_for_a);
            self.backpropagation_policy.update_stats(node, reward);
        }
        trace!("backpropagated score {:.2} from node {}", score_for_a, leaf);
    }

    /// Chooses the final move from the root's children
    fn best_child(&self) -> Result<S> {
        let root = self.tree.get(self.tree.root());
        let mut best: Option<(&MCTSNode<S>, f64)> = None;

        for &child_id in &root.children {
            let child = self.tree.get(child_id);
            let metric = match self.config.best_child_criteria {
                BestChildCriteria::MostVisits => child.visits() as f64,
                BestChildCriteria::HighestValue => child.value(),
            };
            match best {
                Some((_, best_metric)) if metric <= best_metric => {}
                _ => best = Some((child, metric)),
            }
        }

        let (child, _) = best.ok_or_else(|| GameError::TerminalState {
            engine: ENGINE.to_string(),
            key: root.state.key(),
        })?;

        debug!(
            "mcts chose {:?} (visits: {}, value: {:.3}) after {} iterations",
            child.state.previous_move(),
            child.visits(),
            child.value(),
            self.statistics.iterations
        );

        Ok(child.state.clone())
    }

    /// Root children with their visit counts and average rewards, in
    /// expansion order
    pub fn root_children(&self) -> Vec<(S, u64, f64)> {
        let root = self.tree.get(self.tree.root());
        root.children
            .iter()
            .map(|&id| {
                let child = self.tree.get(id);
                (child.state.clone(), child.visits(), child.value())
            })
            .collect()
    }

    /// Visit-proportional distribution over the root's children
    pub fn move_distribution(&self) -> Vec<(S, f64)> {
        let children = self.root_children();
        let total: u64 = children.iter().map(|(_, visits, _)| visits).sum();
        if total == 0 {
            return Vec::new();
        }
        children
            .into_iter()
            .map(|(state, visits, _)| (state, visits as f64 / total as f64))
            .collect()
    }

    /// Returns the search tree
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Counters of the last search
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Discards the tree and searches from a new position next time
    pub fn reset_root(&mut self, state: S) {
        self.tree.reset(state);
    }

    /// Indented text dump of the tree, one node per line in expansion order
    pub fn visualize_tree(&self) -> String {
        let mut out = String::new();
        self.write_subtree(self.tree.root(), &mut out);
        out
    }

    fn write_subtree(&self, id: NodeId, out: &mut String) {
        let node = self.tree.get(id);
        let label = match (node.parent, node.state.previous_move()) {
            (Some(_), Some(mv)) => mv.id().to_string(),
            _ => "Root".to_string(),
        };

        let _ = writeln!(
            out,
            "{}{} (visits: {}, value: {:.3})",
            "  ".repeat(node.depth),
            label,
            node.visits(),
            node.value()
        );

        for &child in &node.children {
            self.write_subtree(child, out);
        }
    }
}
