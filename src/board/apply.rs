use crate::bitboard::square::{self, Square};
use crate::chess_move::{Move, MoveFlag};

use super::castle_rights::{
    kingside_rights, queenside_rights, rights_for, CastleRightsBitmask, NO_CASTLE_RIGHTS,
};
use super::color::Color;
use super::error::BoardError;
use super::piece::Piece;
use super::Position;

impl Position {
    /// Applies a move, producing the successor position. `self` is never
    /// mutated, so callers can freely try candidate moves against shared
    /// snapshots during legality filtering.
    ///
    /// The move's flag directs the side effects: rook relocation for a
    /// castle, bypassed-pawn removal for an en passant capture, en passant
    /// target creation for a double push, and piece substitution for a
    /// promotion. All remaining bookkeeping is unconditional: the en passant
    /// target resets unless the move recreates it, castle rights are revoked
    /// on king or rook departure (or rook capture at home), the halfmove
    /// clock resets on a pawn move or capture and increments otherwise, the
    /// turn flips, and the fullmove number increments after Black's move.
    pub fn apply(&self, chess_move: &Move) -> Result<Position, BoardError> {
        let mut next = self.clone();
        next.apply_in_place(chess_move)?;
        Ok(next)
    }

    fn apply_in_place(&mut self, chess_move: &Move) -> Result<(), BoardError> {
        let from = chess_move.from();
        let to = chess_move.to();
        let (piece, color) = self
            .get(from)
            .ok_or(BoardError::FromSquareIsEmpty { square: from })?;

        validate_promotion(piece, color, to, chess_move.promotion())?;

        let captured_occupant = self.get(to);
        let mut capture_occurred = false;
        let mut next_en_passant_target = None;

        match chess_move.flag() {
            MoveFlag::Standard => {
                if let Some((_, occupant_color)) = captured_occupant {
                    if occupant_color == color {
                        return Err(BoardError::CannotCaptureOwnPiece { square: to });
                    }
                    self.remove(to);
                    capture_occurred = true;
                }
                self.remove(from);
                let placed = chess_move.promotion().unwrap_or(piece);
                self.put(to, placed, color)?;
            }
            MoveFlag::DoublePawnPush => {
                self.remove(from);
                self.put(to, piece, color)?;
                let passed_rank = (from.rank() + to.rank()) / 2;
                next_en_passant_target = Some(Square::from_file_rank(from.file(), passed_rank));
            }
            MoveFlag::EnPassant => {
                if self.en_passant_target() != Some(to) {
                    return Err(BoardError::EnPassantNotAvailable { square: to });
                }
                // the captured pawn sits beside the destination: same file
                // as the destination, same rank as the capturing pawn's origin
                let captured_square = Square::from_file_rank(to.file(), from.rank());
                if self.remove(captured_square).is_none() {
                    return Err(BoardError::EnPassantWithoutCapturedPawn {
                        square: captured_square,
                    });
                }
                capture_occurred = true;
                self.remove(from);
                self.put(to, piece, color)?;
            }
            MoveFlag::CastleKingside | MoveFlag::CastleQueenside => {
                self.apply_castle(chess_move.flag(), piece, color, from)?;
            }
        }

        let lost_rights = rights_lost_by_departure(piece, color, from)
            | rights_lost_by_capture(captured_occupant, to);
        self.set_castle_rights(self.castle_rights() & !lost_rights);

        self.set_en_passant_target(next_en_passant_target);

        if piece == Piece::Pawn || capture_occurred {
            self.set_halfmove_clock(0);
        } else {
            self.set_halfmove_clock(self.halfmove_clock() + 1);
        }

        if color == Color::Black {
            self.set_fullmove_number(self.fullmove_number() + 1);
        }
        self.set_turn(color.opposite());

        Ok(())
    }

    fn apply_castle(
        &mut self,
        flag: MoveFlag,
        piece: Piece,
        color: Color,
        from: Square,
    ) -> Result<(), BoardError> {
        let (king_from, king_to, rook_from, rook_to) = match (flag, color) {
            (MoveFlag::CastleKingside, Color::White) => {
                (square::E1, square::G1, square::H1, square::F1)
            }
            (MoveFlag::CastleKingside, Color::Black) => {
                (square::E8, square::G8, square::H8, square::F8)
            }
            (MoveFlag::CastleQueenside, Color::White) => {
                (square::E1, square::C1, square::A1, square::D1)
            }
            _ => (square::E8, square::C8, square::A8, square::D8),
        };

        if piece != Piece::King || from != king_from {
            return Err(BoardError::CastleWithoutKing { color });
        }
        if self.get(rook_from) != Some((Piece::Rook, color)) {
            return Err(BoardError::CastleWithoutRook { color });
        }

        self.remove(king_from);
        self.remove(rook_from);
        self.put(king_to, Piece::King, color)?;
        self.put(rook_to, Piece::Rook, color)?;
        Ok(())
    }
}

fn validate_promotion(
    piece: Piece,
    color: Color,
    to: Square,
    promotion: Option<Piece>,
) -> Result<(), BoardError> {
    let last_rank = match color {
        Color::White => 7,
        Color::Black => 0,
    };
    let promoting = piece == Piece::Pawn && to.rank() == last_rank;

    match (promoting, promotion) {
        (true, Some(Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => Ok(()),
        (false, None) => Ok(()),
        _ => Err(BoardError::InvalidPromotion),
    }
}

fn rights_lost_by_departure(piece: Piece, color: Color, from: Square) -> CastleRightsBitmask {
    match piece {
        Piece::King => rights_for(color),
        Piece::Rook => match (color, from) {
            (Color::White, square::A1) | (Color::Black, square::A8) => queenside_rights(color),
            (Color::White, square::H1) | (Color::Black, square::H8) => kingside_rights(color),
            _ => NO_CASTLE_RIGHTS,
        },
        _ => NO_CASTLE_RIGHTS,
    }
}

fn rights_lost_by_capture(
    captured: Option<(Piece, Color)>,
    to: Square,
) -> CastleRightsBitmask {
    match captured {
        Some((Piece::Rook, color)) => match (color, to) {
            (Color::White, square::A1) | (Color::Black, square::A8) => queenside_rights(color),
            (Color::White, square::H1) | (Color::Black, square::H8) => kingside_rights(color),
            _ => NO_CASTLE_RIGHTS,
        },
        _ => NO_CASTLE_RIGHTS,
    }
}
