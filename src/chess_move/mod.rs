use core::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::bitboard::square::{self, Square};
use crate::board::color::Color;
use crate::board::error::BoardError;
use crate::board::piece::Piece;
use crate::board::Position;

static COORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^([a-h][1-8])([a-h][1-8])([nbrq])?$").expect("COORD_RE regex should be valid")
});

/// How a move is applied. The flag is derived from the position during move
/// generation (or by [`Move::classify`]), never set freely by callers, and it
/// determines the side effects of application: rook relocation for castling,
/// bypassed-pawn removal for en passant, en passant target creation for a
/// double push.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum MoveFlag {
    Standard,
    DoublePawnPush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
}

/// A move: source and destination squares, an optional promotion kind, and
/// the derived classification flag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Piece>,
    flag: MoveFlag,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid coordinate notation `{notation}`")]
    InvalidNotation { notation: String },
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl Move {
    pub fn standard(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            flag: MoveFlag::Standard,
        }
    }

    pub fn double_pawn_push(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            flag: MoveFlag::DoublePawnPush,
        }
    }

    pub fn en_passant(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            flag: MoveFlag::EnPassant,
        }
    }

    pub fn promote(from: Square, to: Square, promote_to: Piece) -> Self {
        Self {
            from,
            to,
            promotion: Some(promote_to),
            flag: MoveFlag::Standard,
        }
    }

    pub fn castle_kingside(color: Color) -> Self {
        let (from, to) = match color {
            Color::White => (square::E1, square::G1),
            Color::Black => (square::E8, square::G8),
        };
        Self {
            from,
            to,
            promotion: None,
            flag: MoveFlag::CastleKingside,
        }
    }

    pub fn castle_queenside(color: Color) -> Self {
        let (from, to) = match color {
            Color::White => (square::E1, square::C1),
            Color::Black => (square::E8, square::C8),
        };
        Self {
            from,
            to,
            promotion: None,
            flag: MoveFlag::CastleQueenside,
        }
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn promotion(&self) -> Option<Piece> {
        self.promotion
    }

    pub fn flag(&self) -> MoveFlag {
        self.flag
    }

    /// Derives the classification of an externally constructed move against
    /// a position: a two-rank pawn advance is a double push, a pawn moving
    /// diagonally onto the en passant target is an en passant capture, and a
    /// two-file king move is a castle.
    pub fn classify(
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        position: &Position,
    ) -> Result<Self, BoardError> {
        let (piece, _) = position
            .get(from)
            .ok_or(BoardError::FromSquareIsEmpty { square: from })?;

        let flag = match piece {
            Piece::Pawn if position.en_passant_target() == Some(to) && from.file() != to.file() => {
                MoveFlag::EnPassant
            }
            Piece::Pawn if (from.rank() as i8 - to.rank() as i8).abs() == 2 => {
                MoveFlag::DoublePawnPush
            }
            Piece::King if from.rank() == to.rank() && from.file() == 4 && to.file() == 6 => {
                MoveFlag::CastleKingside
            }
            Piece::King if from.rank() == to.rank() && from.file() == 4 && to.file() == 2 => {
                MoveFlag::CastleQueenside
            }
            _ => MoveFlag::Standard,
        };

        Ok(Self {
            from,
            to,
            promotion,
            flag,
        })
    }

    /// Parses compact coordinate notation (`e2e4`, `e7e8q`) and classifies
    /// the result against the given position.
    pub fn from_coordinate(notation: &str, position: &Position) -> Result<Self, MoveParseError> {
        let caps = COORD_RE
            .captures(notation)
            .ok_or_else(|| MoveParseError::InvalidNotation {
                notation: notation.to_string(),
            })?;

        let from = Square::from_algebraic(&caps[1]).expect("COORD_RE guarantees a valid square");
        let to = Square::from_algebraic(&caps[2]).expect("COORD_RE guarantees a valid square");
        let promotion = caps.get(3).map(|m| match m.as_str() {
            "n" => Piece::Knight,
            "b" => Piece::Bishop,
            "r" => Piece::Rook,
            _ => Piece::Queen,
        });

        Ok(Self::classify(from, to, promotion, position)?)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            let letter = match promotion {
                Piece::Knight => 'n',
                Piece::Bishop => 'b',
                Piece::Rook => 'r',
                _ => 'q',
            };
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self, self.flag)
    }
}

#[macro_export]
macro_rules! std_move {
    ($from:expr, $to:expr) => {
        $crate::chess_move::Move::standard($from, $to)
    };
}

#[macro_export]
macro_rules! double_push {
    ($from:expr, $to:expr) => {
        $crate::chess_move::Move::double_pawn_push($from, $to)
    };
}

#[macro_export]
macro_rules! en_passant_move {
    ($from:expr, $to:expr) => {
        $crate::chess_move::Move::en_passant($from, $to)
    };
}

#[macro_export]
macro_rules! promotion {
    ($from:expr, $to:expr, $piece:expr) => {
        $crate::chess_move::Move::promote($from, $to, $piece)
    };
}

#[macro_export]
macro_rules! castle_kingside {
    ($color:expr) => {
        $crate::chess_move::Move::castle_kingside($color)
    };
}

#[macro_export]
macro_rules! castle_queenside {
    ($color:expr) => {
        $crate::chess_move::Move::castle_queenside($color)
    };
}
