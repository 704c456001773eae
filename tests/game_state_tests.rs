use boardplay::{
    Board, Cell, ConnectFour, GameError, GameState, Heuristic, Outcome, Side, TicTacToe,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Every state visited by a random game from `start`, including `start`
fn random_game<S: GameState>(start: S, rng: &mut ChaCha8Rng) -> Vec<S> {
    let mut states = vec![start];
    loop {
        let successors = states[states.len() - 1].legal_moves();
        match successors.choose(rng) {
            Some(next) => states.push(next.clone()),
            None => return states,
        }
    }
}

/// Asserts that `child` is `parent` plus exactly one piece of the mover
fn assert_single_placement<S: GameState>(parent: &S, child: &S) {
    let changed: Vec<(usize, Cell, Cell)> = parent
        .board()
        .cells()
        .iter()
        .zip(child.board().cells())
        .enumerate()
        .filter(|(_, (before, after))| before != after)
        .map(|(i, (&before, &after))| (i, before, after))
        .collect();

    assert_eq!(changed.len(), 1, "exactly one cell should change");
    let (_, before, after) = changed[0];
    assert_eq!(before, Cell::Empty);
    assert_eq!(after, parent.to_move().cell());
    assert_eq!(child.to_move(), parent.to_move().opponent());
    assert!(child.previous_move().is_some());
}

fn check_contract<S: GameState>(start: S, games: u64) {
    for seed in 0..games {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for state in random_game(start.clone(), &mut rng) {
            let successors = state.legal_moves();

            assert_eq!(successors.is_empty(), state.is_terminal());
            assert_eq!(
                state.winner() == Outcome::Undetermined,
                !successors.is_empty(),
                "undetermined iff moves remain in {}",
                state.key()
            );

            for (mv, child) in state.available_moves().iter().zip(&successors) {
                assert_single_placement(&state, child);
                assert_eq!(child.previous_move().as_ref(), Some(mv));
            }
        }
    }
}

#[test]
fn test_tictactoe_successors_place_one_piece() {
    check_contract(TicTacToe::new(), 50);
}

#[test]
fn test_connect_four_successors_place_one_piece() {
    check_contract(ConnectFour::new(), 20);
}

#[test]
fn test_larger_tictactoe_obeys_contract() {
    check_contract(TicTacToe::with_size(4, 5, 4).unwrap(), 10);
}

#[test]
fn test_initial_tictactoe_state() {
    let state = TicTacToe::new();
    assert_eq!(state.to_move(), Side::A);
    assert_eq!(state.previous_move(), None);
    assert_eq!(state.winner(), Outcome::Undetermined);
    assert_eq!(state.legal_moves().len(), 9);
    assert_eq!(state.board().rows(), 3);
    assert_eq!(state.board().cols(), 3);
    assert_eq!(state.key(), "ttt:3:X:.../.../...");
}

#[test]
fn test_copy_is_independent() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let states = random_game(TicTacToe::new(), &mut rng);
    let original = states[2].clone();

    let mut copy = original.clone();
    assert_eq!(copy, original);

    let mv = copy.available_moves()[0];
    copy.make_move(&mv).unwrap();

    assert_ne!(copy, original);
    assert_eq!(original, states[2]);
    assert_eq!(original.board().count(Cell::Empty), 7);
}

#[test]
fn test_checked_move_rejects_occupied_cell() {
    let mut state = TicTacToe::new();
    state.make_move(&4).unwrap();
    let before = state.clone();

    let error = state.make_move(&4).unwrap_err();
    assert!(matches!(error, GameError::IllegalMove { .. }));
    assert_eq!(state, before, "a rejected move leaves the state unchanged");

    assert!(state.make_move(&9).is_err(), "off-board moves are illegal");
}

#[test]
fn test_no_moves_after_a_win() {
    // X completed the top row; the board still has empty cells
    let state = TicTacToe::from_key("ttt:3:O:XXX/OO./...").unwrap();
    assert_eq!(state.winner(), Outcome::AWins);
    assert!(state.legal_moves().is_empty());
    assert!(!state.is_legal(&8));
}

#[test]
fn test_tictactoe_win_lines() {
    let column = TicTacToe::from_key("ttt:3:X:OX./OX./O.X").unwrap();
    assert_eq!(column.winner(), Outcome::BWins);

    let diagonal = TicTacToe::from_key("ttt:3:O:XO./.XO/..X").unwrap();
    assert_eq!(diagonal.winner(), Outcome::AWins);

    let draw = TicTacToe::from_key("ttt:3:O:XOX/XOO/OXX").unwrap();
    assert_eq!(draw.winner(), Outcome::Draw);
    assert!(draw.legal_moves().is_empty());
}

#[test]
fn test_evaluation_sign_convention() {
    let a_wins = TicTacToe::from_key("ttt:3:O:XXX/OO./...").unwrap();
    let b_wins = TicTacToe::from_key("ttt:3:X:OX./OX./O.X").unwrap();
    let open = TicTacToe::from_key("ttt:3:O:.../.X./...").unwrap();

    for heuristic in [Heuristic::Outcome, Heuristic::OpenLines] {
        assert_eq!(a_wins.evaluate_position(heuristic), 1.0);
        assert_eq!(b_wins.evaluate_position(heuristic), -1.0);
    }
    assert_eq!(open.evaluate_position(Heuristic::Outcome), 0.0);

    let score = open.evaluate_position(Heuristic::OpenLines);
    assert!(score > 0.0 && score < 1.0);
    assert_eq!(score, open.evaluate_position(Heuristic::OpenLines));
}

#[test]
fn test_key_round_trip() {
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for state in random_game(TicTacToe::new(), &mut rng) {
            assert_eq!(TicTacToe::from_key(&state.key()).unwrap(), state);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for state in random_game(ConnectFour::new(), &mut rng) {
            assert_eq!(ConnectFour::from_key(&state.key()).unwrap(), state);
        }
    }
}

#[test]
fn test_malformed_states_are_rejected() {
    // Unknown symbol
    assert!(matches!(
        TicTacToe::from_key("ttt:3:X:X?./.../..."),
        Err(GameError::MalformedState(_))
    ));
    // Turn flag contradicts piece counts
    assert!(matches!(
        TicTacToe::from_key("ttt:3:X:X../.../..."),
        Err(GameError::MalformedState(_))
    ));
    // Too many pieces for one side
    assert!(TicTacToe::from_key("ttt:3:O:XX./.../...").is_err());
    // Both sides completed a line
    assert!(TicTacToe::from_key("ttt:3:X:XXX/OOO/...").is_err());
    // O kept playing after X won, and the reverse
    assert!(matches!(
        TicTacToe::from_key("ttt:3:X:XXX/OO./O.."),
        Err(GameError::MalformedState(_))
    ));
    assert!(TicTacToe::from_key("ttt:3:O:OOO/XX./XX.").is_err());
    // Same rule under gravity: both players stacked four, X first
    assert!(matches!(
        ConnectFour::from_key("c4:4:X:......./......./XO...../XO...../XO...../XO....."),
        Err(GameError::MalformedState(_))
    ));
    // The position one move earlier is a legal win for X
    let won = ConnectFour::from_key("c4:4:O:......./......./X....../XO...../XO...../XO.....")
        .unwrap();
    assert_eq!(won.winner(), Outcome::AWins);
    // Piece floating above an empty cell
    assert!(matches!(
        ConnectFour::from_key("c4:3:O:X../.../..."),
        Err(GameError::MalformedState(_))
    ));
    // Wrong prefix
    assert!(ConnectFour::from_key("ttt:3:X:.../.../...").is_err());
}

#[test]
fn test_connect_four_pieces_fall() {
    let mut state = ConnectFour::new();
    state.make_move(&3).unwrap();
    state.make_move(&3).unwrap();

    assert_eq!(state.board().get(5, 3), Some(Cell::A));
    assert_eq!(state.board().get(4, 3), Some(Cell::B));
    assert_eq!(state.board().get(3, 3), Some(Cell::Empty));
}

#[test]
fn test_connect_four_full_column_is_illegal() {
    let mut state = ConnectFour::new();
    for _ in 0..6 {
        state.make_move(&0).unwrap();
    }
    assert!(!state.is_legal(&0));
    assert!(state.make_move(&0).is_err());
    assert_eq!(state.available_moves(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_connect_four_vertical_win() {
    let mut state = ConnectFour::new();
    for mv in [0, 1, 0, 1, 0, 1, 0] {
        state.make_move(&mv).unwrap();
    }
    assert_eq!(state.winner(), Outcome::AWins);
    assert!(state.legal_moves().is_empty());
}

#[test]
fn test_connect_four_diagonal_win() {
    let mut state = ConnectFour::new();
    // B builds support so A can climb the diagonal 0..3
    for mv in [0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3] {
        state.make_move(&mv).unwrap();
    }
    assert_eq!(state.winner(), Outcome::AWins);
}

#[test]
fn test_full_board_checks_alignment_before_draw() {
    let state = ConnectFour::from_key("c4:3:O:OXO/OOX/XXX").unwrap();
    assert!(state.board().is_full());
    assert_eq!(state.winner(), Outcome::AWins);

    let board = Board::parse_rows("OXO/XOX/XOX").unwrap();
    let drawn = ConnectFour::from_board(board, 3, Side::B).unwrap();
    assert_eq!(drawn.winner(), Outcome::Draw);
}

#[test]
fn test_rendering_uses_canonical_symbols() {
    let state = TicTacToe::from_key("ttt:3:X:XO./.../...").unwrap();
    let text = state.to_string();
    assert!(text.contains("0 X O ."));
    assert!(text.contains("X to move"));
    assert_eq!(Cell::Empty.symbol(), '.');
    assert_eq!(Side::A.symbol(), 'X');
    assert_eq!(Side::B.symbol(), 'O');
}

#[test]
fn test_vector_representation() {
    let state = TicTacToe::from_key("ttt:3:X:XO./.../...").unwrap();
    let vector = state.board().vector_representation();
    assert_eq!(vector.len(), 9);
    assert_eq!(&vector[..3], &[1.0, -1.0, 0.0]);
}
