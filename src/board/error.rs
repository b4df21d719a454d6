use thiserror::Error;

use crate::bitboard::Square;

use super::color::Color;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("cannot put a piece on occupied square {square}")]
    SquareOccupied { square: Square },
    #[error("cannot apply chess move, the `from` square {square} is empty")]
    FromSquareIsEmpty { square: Square },
    #[error("cannot capture own piece on {square}")]
    CannotCaptureOwnPiece { square: Square },
    #[error("promotion piece is missing, present on a non-promoting move, or not a valid promotion kind")]
    InvalidPromotion,
    #[error("en passant capture on {square} does not match the current en passant target")]
    EnPassantNotAvailable { square: Square },
    #[error("en passant capture found no pawn to remove on {square}")]
    EnPassantWithoutCapturedPawn { square: Square },
    #[error("cannot castle, the moved piece is not the {color} king on its starting square")]
    CastleWithoutKing { color: Color },
    #[error("cannot castle, no {color} rook on its home square")]
    CastleWithoutRook { color: Color },
    #[error("invariant violation: no {color} king on the board")]
    KingNotFound { color: Color },
    #[error("invalid FEN; could not parse position from `{fen}`")]
    InvalidFen { fen: String },
}
