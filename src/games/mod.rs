//! Reference rule sets implementing [`GameState`](crate::GameState)

pub mod connect_four;
pub mod tictactoe;

pub use connect_four::ConnectFour;
pub use tictactoe::TicTacToe;
