//! Pluggable phases of the MCTS loop
//!
//! Each phase is a trait object owned by [`MCTS`](crate::MCTS): which child to
//! descend into, how to score a new leaf, and how to record the score.

pub mod backpropagation;
pub mod selection;
pub mod simulation;

pub use backpropagation::{BackpropagationPolicy, StandardPolicy};
pub use selection::{SelectionPolicy, UCB1Policy};
pub use simulation::{HeuristicPolicy, RandomPolicy, SimulationPolicy};
