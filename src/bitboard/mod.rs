pub mod bitboard;
pub mod square;

pub use bitboard::Bitboard;
pub use square::Square;
