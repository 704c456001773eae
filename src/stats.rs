//! Counters reported by the search engines
//!
//! MCTS fills the iteration and tree fields, minimax the node, cutoff and
//! cache fields. Whatever an engine does not track stays zero.

use std::time::Duration;

/// What one search did and how long it took
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Completed MCTS iterations
    pub iterations: usize,

    /// Wall-clock time of the whole call
    pub total_time: Duration,

    /// Nodes allocated in the MCTS tree, root included
    pub tree_size: usize,

    /// Deepest ply reached: tree depth for MCTS, the depth bound for minimax
    pub max_depth: usize,

    /// Positions visited by minimax
    pub nodes_evaluated: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Transposition cache hits
    pub cache_hits: u64,

    /// Set when the time limit ended an MCTS search before its iteration budget
    pub stopped_early: bool,
}

impl SearchStatistics {
    /// Statistics for a search that has not started; the tree holds its root
    pub fn new() -> Self {
        SearchStatistics {
            tree_size: 1,
            ..Default::default()
        }
    }

    /// Folds in the counters of a search that ran on another worker
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_evaluated += other.nodes_evaluated;
        self.cutoffs += other.cutoffs;
        self.cache_hits += other.cache_hits;
        self.max_depth = self.max_depth.max(other.max_depth);
    }

    /// Mean microseconds per MCTS iteration, zero before any iteration
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        match self.iterations {
            0 => 0.0,
            n => self.total_time.as_micros() as f64 / n as f64,
        }
    }

    /// MCTS throughput, zero when no time was measured
    pub fn iterations_per_second(&self) -> f64 {
        let seconds = self.total_time.as_secs_f64();
        if seconds > 0.0 {
            self.iterations as f64 / seconds
        } else {
            0.0
        }
    }

    /// Multi-line report for logs and demos
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "searched for {:.3}s, max depth {}",
            self.total_time.as_secs_f64(),
            self.max_depth
        )];
        if self.iterations > 0 {
            lines.push(format!(
                "{} iterations ({:.1}/s, {:.3} µs each), {} tree nodes{}",
                self.iterations,
                self.iterations_per_second(),
                self.avg_time_per_iteration_us(),
                self.tree_size,
                if self.stopped_early {
                    ", stopped by time limit"
                } else {
                    ""
                }
            ));
        }
        if self.nodes_evaluated > 0 {
            lines.push(format!(
                "{} positions, {} cutoffs, {} cache hits",
                self.nodes_evaluated, self.cutoffs, self.cache_hits
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_only_engine_specific_counters() {
        let mut mcts = SearchStatistics::new();
        mcts.iterations = 10;
        mcts.tree_size = 11;
        assert!(mcts.summary().contains("10 iterations"));
        assert!(!mcts.summary().contains("cutoffs"));

        let mut minimax = SearchStatistics::new();
        minimax.nodes_evaluated = 42;
        minimax.cutoffs = 3;
        assert!(minimax.summary().contains("42 positions, 3 cutoffs"));
        assert!(!minimax.summary().contains("iterations"));
    }

    #[test]
    fn merge_adds_counters() {
        let mut total = SearchStatistics::new();
        let worker = SearchStatistics {
            nodes_evaluated: 5,
            cutoffs: 2,
            max_depth: 3,
            ..SearchStatistics::new()
        };
        total.merge(&worker);
        total.merge(&worker);
        assert_eq!(total.nodes_evaluated, 10);
        assert_eq!(total.cutoffs, 4);
        assert_eq!(total.max_depth, 3);
    }
}
