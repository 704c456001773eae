//! Connect Four against the MCTS engine
//!
//! You drop the X pieces and move first. Enter a column number.
//! Set `RUST_LOG=debug` to see the engine's statistics.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use boardplay::{
    ConnectFour, GameController, GameError, GameState, HumanPlayer, MCTSPlayer, MoveSource,
    Outcome, Settings,
};

/// Reads column numbers from stdin
struct Console;

impl MoveSource<ConnectFour> for Console {
    fn request_move(&mut self, state: &ConnectFour, _legal: &[ConnectFour]) -> Option<usize> {
        let cols = state.board().cols();
        println!("{}", state);

        loop {
            print!("Your move (column 0-{}): ", cols - 1);
            io::stdout().flush().unwrap();

            let mut input = String::new();
            if io::stdin().lock().read_line(&mut input).ok()? == 0 {
                return None;
            }

            match input.trim().parse::<usize>() {
                Ok(col) if col < cols => return Some(col),
                _ => println!("Invalid column! Please enter a number between 0 and {}.", cols - 1),
            }
        }
    }

    fn report_illegal(&mut self, mv: &usize, _error: &GameError) {
        println!("Column {} is full! Choose another column.", mv);
    }
}

fn main() {
    env_logger::init();

    println!("Connect Four against MCTS");
    println!("(columns are numbered from 0)");
    println!();

    let settings = Settings {
        iterations: 20_000,
        ..Settings::connect_four()
    };
    let game = settings.connect_four_board().unwrap();

    let config = settings
        .mcts_config()
        .with_max_time(Duration::from_secs(5));

    let controller = GameController::new(
        game,
        Box::new(HumanPlayer::new("you", Console)),
        Box::new(MCTSPlayer::new(config)),
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

    let columns: Vec<String> = record
        .history
        .iter()
        .filter_map(|state| state.previous_move())
        .map(|col| col.to_string())
        .collect();
    println!("Columns played: {}", columns.join(" "));
}
