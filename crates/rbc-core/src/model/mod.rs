pub mod chess_move;
pub mod color;
pub mod fen;
pub mod movegen;
pub mod piece;
pub mod position;
pub mod square;
