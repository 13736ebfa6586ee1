pub mod types;
pub mod error;
pub mod movegen;
pub mod board;
pub mod game;
pub mod perft;
