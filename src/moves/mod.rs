pub mod attacks;
pub mod movegen;
pub mod perft;
pub mod types;
