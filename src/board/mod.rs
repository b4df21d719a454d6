pub mod apply;
pub mod castle_rights;
pub mod color;
pub mod error;
pub mod piece;
pub mod piece_set;

mod display;
mod fen;

use crate::bitboard::Bitboard;
use crate::bitboard::Square;

use castle_rights::{CastleRightsBitmask, ALL_CASTLE_RIGHTS};
use color::Color;
use error::BoardError;
use piece::Piece;
use piece_set::PieceSet;

pub use fen::STARTING_POSITION_FEN;

/// A full chess position: piece placement, side to move, castle rights,
/// en passant target, and the two move clocks.
///
/// A position is a value. Once play begins it is never mutated; the only
/// way to derive a successor is [`Position::apply`], which returns a new
/// position and leaves the original untouched. That makes speculative move
/// application during legality filtering safe by construction. The `put`,
/// `remove`, and `set_*` methods exist for seeding arbitrary positions
/// (FEN import, the `chess_position!` macro) before play.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    white: PieceSet,
    black: PieceSet,
    turn: Color,
    castle_rights: CastleRightsBitmask,
    en_passant_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

/// The reduced state compared for threefold repetition: placement, side to
/// move, castle rights, and en passant target. The clocks deliberately do
/// not participate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PositionSignature {
    white: PieceSet,
    black: PieceSet,
    turn: Color,
    castle_rights: CastleRightsBitmask,
    en_passant_target: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            white: PieceSet::new(),
            black: PieceSet::new(),
            turn: Color::White,
            castle_rights: ALL_CASTLE_RIGHTS,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl Position {
    /// An empty board with White to move and all castle rights intact.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn starting_position() -> Self {
        crate::chess_position! {
            rnbqkbnr
            pppppppp
            ........
            ........
            ........
            ........
            PPPPPPPP
            RNBQKBNR
        }
    }

    pub fn pieces(&self, color: Color) -> &PieceSet {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn pieces_mut(&mut self, color: Color) -> &mut PieceSet {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn occupied(&self) -> Bitboard {
        self.white.occupied() | self.black.occupied()
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        square.to_bitboard().overlaps(self.occupied())
    }

    pub fn get(&self, square: Square) -> Option<(Piece, Color)> {
        if let Some(piece) = self.white.get(square) {
            return Some((piece, Color::White));
        }
        self.black.get(square).map(|piece| (piece, Color::Black))
    }

    /// Every (square, piece) pair of the given color, in square order.
    pub fn pieces_of(&self, color: Color) -> Vec<(Square, Piece)> {
        let mut found = Vec::with_capacity(self.pieces(color).occupied().count_ones() as usize);
        let mut occupied = self.pieces(color).occupied();
        while !occupied.is_empty() {
            let square = occupied.pop_lsb();
            if let Some(piece) = self.pieces(color).get(square) {
                found.push((square, piece));
            }
        }
        found
    }

    /// The square of the given color's king. A well-formed game always has
    /// exactly one king per color, so an error here signals corruption.
    pub fn king_square(&self, color: Color) -> Result<Square, BoardError> {
        let king = self.pieces(color).locate(Piece::King);
        if king.is_empty() {
            return Err(BoardError::KingNotFound { color });
        }
        Ok(king.lsb())
    }

    pub fn put(&mut self, square: Square, piece: Piece, color: Color) -> Result<(), BoardError> {
        if self.is_occupied(square) {
            return Err(BoardError::SquareOccupied { square });
        }
        self.pieces_mut(color).put(square, piece)
    }

    pub fn remove(&mut self, square: Square) -> Option<(Piece, Color)> {
        let (piece, color) = self.get(square)?;
        self.pieces_mut(color).remove(square)?;
        Some((piece, color))
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    pub fn castle_rights(&self) -> CastleRightsBitmask {
        self.castle_rights
    }

    pub fn set_castle_rights(&mut self, rights: CastleRightsBitmask) {
        self.castle_rights = rights;
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.en_passant_target = target;
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn set_fullmove_number(&mut self, number: u32) {
        self.fullmove_number = number;
    }

    pub fn signature(&self) -> PositionSignature {
        PositionSignature {
            white: self.white.clone(),
            black: self.black.clone(),
            turn: self.turn,
            castle_rights: self.castle_rights,
            en_passant_target: self.en_passant_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::castle_rights::*;
    use super::*;
    use crate::bitboard::square::*;

    #[test]
    fn test_starting_position_setup() {
        let position = Position::starting_position();

        assert_eq!(Some((Piece::Rook, Color::White)), position.get(A1));
        assert_eq!(Some((Piece::Knight, Color::White)), position.get(B1));
        assert_eq!(Some((Piece::Bishop, Color::White)), position.get(C1));
        assert_eq!(Some((Piece::Queen, Color::White)), position.get(D1));
        assert_eq!(Some((Piece::King, Color::White)), position.get(E1));
        assert_eq!(Some((Piece::Queen, Color::Black)), position.get(D8));
        assert_eq!(Some((Piece::King, Color::Black)), position.get(E8));

        for file in 0..8 {
            assert_eq!(
                Some((Piece::Pawn, Color::White)),
                position.get(Square::from_file_rank(file, 1))
            );
            assert_eq!(
                Some((Piece::Pawn, Color::Black)),
                position.get(Square::from_file_rank(file, 6))
            );
        }

        assert_eq!(Color::White, position.turn());
        assert_eq!(ALL_CASTLE_RIGHTS, position.castle_rights());
        assert_eq!(None, position.en_passant_target());
        assert_eq!(0, position.halfmove_clock());
        assert_eq!(1, position.fullmove_number());
        assert_eq!(32, position.occupied().count_ones());
    }

    #[test]
    fn test_king_square() {
        let position = Position::starting_position();
        assert_eq!(Ok(E1), position.king_square(Color::White));
        assert_eq!(Ok(E8), position.king_square(Color::Black));

        let empty = Position::new();
        assert_eq!(
            Err(BoardError::KingNotFound {
                color: Color::White
            }),
            empty.king_square(Color::White)
        );
    }

    #[test]
    fn test_pieces_of_is_in_square_order() {
        let position = crate::chess_position! {
            ........
            ........
            ........
            ........
            ..N.....
            ........
            P.......
            ....K...
        };
        assert_eq!(
            vec![(E1, Piece::King), (A2, Piece::Pawn), (C4, Piece::Knight)],
            position.pieces_of(Color::White)
        );
    }

    #[test]
    fn test_signature_ignores_clocks() {
        let mut a = Position::starting_position();
        let mut b = Position::starting_position();
        a.set_halfmove_clock(12);
        b.set_fullmove_number(30);
        assert!(a.signature() == b.signature());
    }
}
