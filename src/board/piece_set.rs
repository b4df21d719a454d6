use crate::bitboard::{Bitboard, Square};

use super::error::BoardError;
use super::piece::{Piece, ALL_PIECES};

/// The pieces of one color, represented as one bitboard per piece kind plus
/// an incrementally maintained occupancy bitboard.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PieceSet {
    bitboards: [Bitboard; 6],
    occupied: Bitboard,
}

impl Default for PieceSet {
    fn default() -> Self {
        PieceSet {
            bitboards: [Bitboard::EMPTY; 6],
            occupied: Bitboard::EMPTY,
        }
    }
}

impl PieceSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// All squares holding the given piece kind.
    pub fn locate(&self, piece: Piece) -> Bitboard {
        self.bitboards[piece as usize]
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        let bb = square.to_bitboard();
        if !bb.overlaps(self.occupied) {
            return None;
        }
        ALL_PIECES
            .into_iter()
            .find(|&piece| bb.overlaps(self.bitboards[piece as usize]))
    }

    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        square.to_bitboard().overlaps(self.occupied)
    }

    pub fn put(&mut self, square: Square, piece: Piece) -> Result<(), BoardError> {
        if self.is_occupied(square) {
            return Err(BoardError::SquareOccupied { square });
        }

        let bb = square.to_bitboard();
        self.bitboards[piece as usize] |= bb;
        self.occupied |= bb;
        Ok(())
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let removed = self.get(square)?;
        let bb = square.to_bitboard();
        self.bitboards[removed as usize] ^= bb;
        self.occupied ^= bb;
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::square::*;

    #[test]
    fn test_put_and_get() {
        let mut pieces = PieceSet::new();
        pieces.put(E4, Piece::Knight).unwrap();
        assert_eq!(Some(Piece::Knight), pieces.get(E4));
        assert_eq!(None, pieces.get(E5));
        assert!(pieces.is_occupied(E4));
    }

    #[test]
    fn test_put_rejects_occupied_square() {
        let mut pieces = PieceSet::new();
        pieces.put(A1, Piece::Rook).unwrap();
        assert_eq!(
            Err(BoardError::SquareOccupied { square: A1 }),
            pieces.put(A1, Piece::Queen)
        );
    }

    #[test]
    fn test_remove_updates_occupancy() {
        let mut pieces = PieceSet::new();
        pieces.put(C3, Piece::Bishop).unwrap();
        assert_eq!(Some(Piece::Bishop), pieces.remove(C3));
        assert_eq!(None, pieces.remove(C3));
        assert!(pieces.occupied().is_empty());
    }
}
