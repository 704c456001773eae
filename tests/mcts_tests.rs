use boardplay::{
    config::BestChildCriteria,
    policy::{HeuristicPolicy, UCB1Policy},
    ConnectFour, GameError, GameState, Heuristic, MCTS, MCTSConfig, MCTSPlayer, Minimax,
    MinimaxConfig, NodeId, Player, SearchTree, SelectionPolicy, TicTacToe,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

fn config(iterations: usize, seed: u64) -> MCTSConfig {
    MCTSConfig::default()
        .with_max_iterations(iterations)
        .with_seed(seed)
}

/// (move, visits) for every root child, in expansion order
fn root_visits<S: GameState + 'static>(mcts: &MCTS<S>) -> Vec<(Option<S::Move>, u64)> {
    mcts.root_children()
        .into_iter()
        .map(|(state, visits, _)| (state.previous_move(), visits))
        .collect()
}

#[test]
fn test_same_seed_same_search() {
    let state = TicTacToe::from_key("ttt:3:O:.../.X./...").unwrap();

    let mut first = MCTS::new(state.clone(), config(500, 7));
    let mut second = MCTS::new(state, config(500, 7));

    assert_eq!(first.search().unwrap(), second.search().unwrap());
    assert_eq!(root_visits(&first), root_visits(&second));
    assert_eq!(first.tree().len(), second.tree().len());
}

#[test]
fn test_injected_rng_matches_seeded_config() {
    let state = ConnectFour::new();

    let mut seeded = MCTS::new(state.clone(), config(300, 5));
    let mut injected = MCTS::with_rng(
        state,
        MCTSConfig::default().with_max_iterations(300),
        ChaCha8Rng::seed_from_u64(5),
    );

    assert_eq!(seeded.search().unwrap(), injected.search().unwrap());
    assert_eq!(root_visits(&seeded), root_visits(&injected));
}

#[test]
fn test_finds_immediate_win() {
    let state = TicTacToe::from_key("ttt:3:X:XO./.X./O..").unwrap();
    let mut mcts = MCTS::new(state, config(2000, 1));
    let chosen = mcts.search().unwrap();
    assert_eq!(chosen.previous_move(), Some(8));
}

#[test]
fn test_finds_connect_four_win() {
    let mut state = ConnectFour::new();
    for mv in [0, 0, 1, 1, 2, 2] {
        state.make_move(&mv).unwrap();
    }

    let mut mcts = MCTS::new(state, config(1000, 2));
    let chosen = mcts.search().unwrap();
    assert_eq!(chosen.previous_move(), Some(3));
}

#[test]
fn test_converges_to_minimax_choice() {
    // Only blocking the top row avoids a loss, and it also forks
    let state = TicTacToe::from_key("ttt:3:X:OO./.X./..X").unwrap();
    let optimal = Minimax::new(MinimaxConfig::default().with_depth(7))
        .choose_move(&state)
        .unwrap();

    for seed in 0..3 {
        for budget in [1000, 3000, 6000] {
            let mut mcts = MCTS::new(state.clone(), config(budget, seed));
            assert_eq!(
                mcts.search().unwrap(),
                optimal,
                "seed {} budget {}",
                seed,
                budget
            );
        }
    }
}

#[test]
fn test_terminal_root_is_an_error() {
    let finished = TicTacToe::from_key("ttt:3:X:OX./OX./O.X").unwrap();
    let mut mcts = MCTS::new(finished, config(100, 0));
    assert!(matches!(
        mcts.search(),
        Err(GameError::TerminalState { .. })
    ));
}

#[test]
fn test_zero_budget_is_rejected() {
    let mut mcts = MCTS::new(TicTacToe::new(), config(0, 0));
    assert!(matches!(
        mcts.search(),
        Err(GameError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_visit_counts_are_consistent() {
    let iterations = 800;
    let mut mcts = MCTS::new(TicTacToe::new(), config(iterations, 3));
    mcts.search().unwrap();

    let tree = mcts.tree();
    let root = tree.get(tree.root());
    assert_eq!(root.visits(), iterations as u64);

    let child_visits: u64 = root.children.iter().map(|&id| tree.get(id).visits()).sum();
    assert_eq!(child_visits, root.visits());

    for index in 1..tree.len() {
        let node = tree.get(NodeId(index as u32));
        if node.state.is_terminal() {
            assert!(node.is_leaf());
            continue;
        }
        let below: u64 = node.children.iter().map(|&id| tree.get(id).visits()).sum();
        assert_eq!(node.visits(), below + 1, "node {}", index);
        assert_eq!(node.mover, tree.get(node.parent.unwrap()).state.to_move());
    }

    let statistics = mcts.get_statistics();
    assert_eq!(statistics.iterations, iterations);
    assert_eq!(statistics.tree_size, tree.len());
    assert!(statistics.max_depth >= 2);
    assert!(!statistics.stopped_early);
}

#[test]
fn test_children_expand_in_enumeration_order() {
    let state = TicTacToe::new();
    let mut mcts = MCTS::new(state.clone(), config(9, 0));
    mcts.search().unwrap();

    let expanded: Vec<_> = mcts
        .root_children()
        .into_iter()
        .map(|(child, visits, _)| {
            assert_eq!(visits, 1);
            child
        })
        .collect();
    assert_eq!(expanded, state.legal_moves());
}

#[test]
fn test_move_distribution_sums_to_one() {
    let mut mcts = MCTS::new(TicTacToe::new(), config(400, 4));
    mcts.search().unwrap();

    let distribution = mcts.move_distribution();
    assert_eq!(distribution.len(), 9);
    let total: f64 = distribution.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let mut player = MCTSPlayer::new(config(400, 4));
    let weights = player.move_distribution(&TicTacToe::new()).unwrap();
    assert_eq!(weights, distribution);
}

#[test]
fn test_highest_value_criterion() {
    let state = TicTacToe::from_key("ttt:3:X:XO./.X./O..").unwrap();
    let config = config(2000, 9).with_best_child_criteria(BestChildCriteria::HighestValue);
    let mut mcts = MCTS::new(state, config);
    let chosen = mcts.search().unwrap();

    let children = mcts.root_children();
    let best_value = children
        .iter()
        .map(|(_, _, value)| *value)
        .fold(f64::NEG_INFINITY, f64::max);
    let first_best = children
        .iter()
        .find(|(_, _, value)| *value == best_value)
        .map(|(state, _, _)| state.clone());
    assert_eq!(Some(chosen), first_best);
    assert_eq!(best_value, 1.0);
}

#[test]
fn test_heuristic_playouts() {
    let state = TicTacToe::from_key("ttt:3:X:XO./.X./O..").unwrap();
    let mut mcts = MCTS::new(state, config(1000, 6))
        .with_simulation_policy(HeuristicPolicy::new(Heuristic::OpenLines));
    let chosen = mcts.search().unwrap();
    assert_eq!(chosen.previous_move(), Some(8));
}

#[test]
fn test_time_limited_search() {
    let config = MCTSConfig::default()
        .with_max_iterations(10_000_000)
        .with_max_time(Duration::from_millis(50))
        .with_seed(0);
    let mut mcts = MCTS::new(ConnectFour::new(), config);
    mcts.search().unwrap();

    let statistics = mcts.get_statistics();
    assert!(statistics.stopped_early);
    assert!(statistics.iterations > 0);
    assert!(statistics.iterations < 10_000_000);
    assert!(statistics.total_time >= Duration::from_millis(50));
    assert!(statistics.total_time < Duration::from_secs(5));
}

#[test]
fn test_spent_time_limit_still_returns_a_move() {
    let state = TicTacToe::new();
    let config = config(1000, 0).with_max_time(Duration::ZERO);
    let mut mcts = MCTS::new(state.clone(), config);

    let chosen = mcts.search().unwrap();
    assert_eq!(chosen, state.legal_moves()[0]);

    let statistics = mcts.get_statistics();
    assert_eq!(statistics.iterations, 1);
    assert!(statistics.stopped_early);
}

#[test]
fn test_zero_iterations_argument_is_rejected() {
    let mut mcts = MCTS::new(TicTacToe::new(), config(100, 0));
    assert!(matches!(
        mcts.search_for_iterations(0),
        Err(GameError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_search_for_time_restores_config() {
    let mut mcts = MCTS::new(ConnectFour::new(), config(10_000_000, 0));
    mcts.search_for_time(Duration::from_millis(20)).unwrap();
    assert!(mcts.get_statistics().stopped_early);

    // Without the time bound the next search runs its full budget
    mcts.search_for_iterations(50).unwrap();
    assert_eq!(mcts.get_statistics().iterations, 50);
    assert!(!mcts.get_statistics().stopped_early);
}

#[test]
fn test_reset_root_searches_new_position() {
    let mut mcts = MCTS::new(TicTacToe::new(), config(200, 8));
    mcts.search().unwrap();

    let next = TicTacToe::from_key("ttt:3:X:XO./.X./O..").unwrap();
    mcts.reset_root(next.clone());
    mcts.search().unwrap();
    assert_eq!(mcts.tree().get(mcts.tree().root()).state, next);
    assert_eq!(mcts.root_children().len(), 5);
}

#[test]
fn test_tree_visualization() {
    let mut mcts = MCTS::new(TicTacToe::new(), config(100, 2));
    mcts.search().unwrap();

    let text = mcts.visualize_tree();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().map(|line| line.starts_with("Root (visits: 100")),
        Some(true)
    );
    assert!(text.contains("  0 (visits: "));
    assert_eq!(text.lines().count(), mcts.tree().len());
}

#[test]
fn test_ucb1_prefers_first_on_ties() {
    let mut tree = SearchTree::new(TicTacToe::new());
    assert!(!tree.is_empty());
    assert_eq!(tree.len(), 1);
    let root = tree.root();
    let first = tree.expand(root).unwrap();
    let second = tree.expand(root).unwrap();

    let policy = UCB1Policy::default();
    assert_eq!(policy.select_child(&tree, root), Some(first));

    for id in [root, first, second] {
        tree.get(id).increment_visits();
    }
    tree.get(first).add_reward(0.5);
    tree.get(second).add_reward(0.5);
    assert_eq!(policy.select_child(&tree, root), Some(first));

    tree.get(second).add_reward(0.25);
    assert_eq!(policy.select_child(&tree, root), Some(second));
}
