//! A rules-complete chess core: bitboard position representation, legal
//! move generation, move application, and game state tracking with the
//! full set of draw and mate conditions.

pub mod bitboard;
pub mod board;
pub mod chess_move;
pub mod game;
pub mod move_generator;
