use std::fmt;

use crate::bitboard::Square;

use super::Position;

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let cell = match self.get(Square::from_file_rank(file, rank)) {
                    Some((piece, color)) => piece.to_fen(color),
                    None => '.',
                };
                write!(f, "{} ", cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self)?;
        write!(f, "({})", self.to_fen())
    }
}

/// Builds a [`Position`] from a picture of the board, written from White's
/// perspective with FEN piece letters and `.` for empty squares. Castle
/// rights, turn, and clocks take their defaults; tests adjust them through
/// the setters when it matters.
#[macro_export]
macro_rules! chess_position {
    ($($piece:tt)*) => {{
        let mut position = $crate::board::Position::new();
        let cells: Vec<char> = stringify!($($piece)*)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert_eq!(64, cells.len(), "expected 64 squares, got {}", cells.len());
        for (i, &cell) in cells.iter().enumerate() {
            if cell == '.' {
                continue;
            }
            let (piece, color) = $crate::board::piece::Piece::from_fen(cell)
                .unwrap_or_else(|| panic!("invalid piece character `{}`", cell));
            // the first character of the picture is a8, the last is h1
            let file = (i % 8) as u8;
            let rank = 7 - (i / 8) as u8;
            position
                .put(
                    $crate::bitboard::Square::from_file_rank(file, rank),
                    piece,
                    color,
                )
                .expect("duplicate piece placement");
        }
        position
    }};
}
