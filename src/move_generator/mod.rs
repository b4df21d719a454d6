//! Move generation: attack maps, pseudo-legal move enumeration, and the
//! simulate-and-filter legality check.

pub mod attack_map;
pub mod generator;
mod ray_table;
mod targets;

pub use attack_map::{attacked_squares, is_in_check};
pub use generator::{count_positions, legal_moves, pseudo_legal_moves, MoveList, PAWN_PROMOTIONS};
