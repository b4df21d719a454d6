use crate::bitboard::Bitboard;
use crate::board::color::Color;
use crate::board::piece::Piece;
use crate::board::Position;

use super::targets;

/// The union of all squares the given color attacks in the position. A square
/// is attacked when a piece could capture on it, so pawn forward pushes are
/// excluded and the first blocker along a sliding ray is included regardless
/// of its color.
pub fn attacked_squares(position: &Position, attacker: Color) -> Bitboard {
    let occupied = position.occupied();
    let pieces = position.pieces(attacker);

    let mut attacks = targets::pawn_attacks(pieces.locate(Piece::Pawn), attacker);

    let mut knights = pieces.locate(Piece::Knight);
    while !knights.is_empty() {
        attacks |= targets::knight_targets(knights.pop_lsb());
    }

    let mut kings = pieces.locate(Piece::King);
    while !kings.is_empty() {
        attacks |= targets::king_targets(kings.pop_lsb());
    }

    for piece in [Piece::Rook, Piece::Bishop, Piece::Queen] {
        let mut sliders = pieces.locate(piece);
        while !sliders.is_empty() {
            attacks |= targets::sliding_targets(sliders.pop_lsb(), piece, occupied);
        }
    }

    attacks
}

/// Whether the given color's king stands on a square attacked by the
/// opponent.
pub fn is_in_check(position: &Position, color: Color) -> bool {
    let king = position.pieces(color).locate(Piece::King);
    king.overlaps(attacked_squares(position, color.opposite()))
}
