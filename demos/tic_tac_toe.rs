//! Tic-Tac-Toe against the minimax engine
//!
//! You play X and move first. Enter moves as `row column`, e.g. `1 2`.
//! Set `RUST_LOG=debug` to see what the engine is doing.

use std::io::{self, BufRead, Write};

use boardplay::{
    GameController, GameError, GameState, HumanPlayer, MinimaxPlayer, MoveSource, Outcome,
    Settings, TicTacToe,
};

/// Reads `row column` pairs from stdin
struct Console;

impl MoveSource<TicTacToe> for Console {
    fn request_move(&mut self, state: &TicTacToe, _legal: &[TicTacToe]) -> Option<usize> {
        let board = state.board();
        println!("{}", state);

        loop {
            print!("Your move (row column): ");
            io::stdout().flush().unwrap();

            let mut input = String::new();
            if io::stdin().lock().read_line(&mut input).ok()? == 0 {
                return None;
            }

            let coords: Vec<usize> = input
                .split_whitespace()
                .filter_map(|s| s.parse::<usize>().ok())
                .collect();

            match coords[..] {
                [row, col] if row < board.rows() && col < board.cols() => {
                    return Some(board.index(row, col))
                }
                _ => println!(
                    "Enter a row (0-{}) and a column (0-{}).",
                    board.rows() - 1,
                    board.cols() - 1
                ),
            }
        }
    }

    fn report_illegal(&mut self, _mv: &usize, _error: &GameError) {
        println!("That cell is taken! Try again.");
    }
}

fn main() {
    env_logger::init();

    println!("Tic-tac-toe against minimax");
    println!("(enter moves as \"row col\")");
    println!();

    let settings = Settings::default();
    let game = settings.tictactoe().unwrap();

    let controller = GameController::new(
        game,
        Box::new(HumanPlayer::new("you", Console)),
        Box::new(MinimaxPlayer::new(settings.minimax_config())),
    );

    let record = match controller.play() {
        Ok(record) => record,
        Err(GameError::Cancelled { .. }) => {
            println!("Goodbye!");
            return;
        }
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    if let Some(last) = record.history.last() {
        println!("{}", last);
    }

    match record.outcome {
        Outcome::AWins => println!("You win!"),
        Outcome::BWins => println!("The engine wins!"),
        _ => println!("The game is a draw!"),
    }

    // Walk back through the game
    println!("Replay:");
    let mut replay = record.history.replay();
    for _ in 1..record.history.len() {
        if let Some(state) = replay.forward() {
            if let Some(cell) = state.previous_move() {
                let (row, col) = (cell / state.board().cols(), cell % state.board().cols());
                println!(
                    "{:>2}. {} at row {}, column {}",
                    replay.position(),
                    state.to_move().opponent().symbol(),
                    row,
                    col
                );
            }
        }
    }
}
