use once_cell::sync::Lazy;
use regex::Regex;

use crate::bitboard::{Bitboard, Square};

use super::castle_rights::{
    BLACK_KINGSIDE_RIGHTS, BLACK_QUEENSIDE_RIGHTS, NO_CASTLE_RIGHTS, WHITE_KINGSIDE_RIGHTS,
    WHITE_QUEENSIDE_RIGHTS,
};
use super::color::Color;
use super::error::BoardError;
use super::piece::Piece;
use super::Position;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static FEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^
        ([pnbrqkPNBRQK1-8]{1,8})   # eighth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # seventh rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # sixth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # fifth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # fourth rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # third rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # second rank
        /
        ([pnbrqkPNBRQK1-8]{1,8})   # first rank
        \x20
        (b|w)                      # side to move
        \x20
        ([kqKQ]{1,4}|-)            # castle rights
        \x20
        ([a-h][36]|-)              # en passant target square
        \x20
        (0|[1-9][0-9]*)            # halfmove clock
        \x20
        ([1-9][0-9]*)              # fullmove number
        $
    ",
    )
    .expect("FEN_RE regex should be valid")
});

impl Position {
    /// Parses the standard six-field board-layout record, allowing tests and
    /// tooling to seed arbitrary positions.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let invalid = || BoardError::InvalidFen {
            fen: fen.to_string(),
        };
        let caps = FEN_RE.captures(fen).ok_or_else(invalid)?;

        let mut position = Self::new();

        // capture groups 1..=8 hold ranks 8 down to 1
        for rank_capture_index in 1..=8 {
            let rank = (8 - rank_capture_index) as u8;
            let mut file = 0u8;

            for fen_char in caps[rank_capture_index].chars() {
                if let Some(run) = fen_char.to_digit(10) {
                    file += run as u8;
                    continue;
                }
                if file >= 8 {
                    return Err(invalid());
                }
                let (piece, color) = Piece::from_fen(fen_char).ok_or_else(invalid)?;
                position.put(Square::from_file_rank(file, rank), piece, color)?;
                file += 1;
            }

            if file != 8 {
                return Err(invalid());
            }
        }

        // pawns cannot stand on their own or the opposing back rank; a
        // record placing one there describes an unreachable position
        let pawns = position.pieces(Color::White).locate(Piece::Pawn)
            | position.pieces(Color::Black).locate(Piece::Pawn);
        if pawns.overlaps(Bitboard::RANK_1 | Bitboard::RANK_8) {
            return Err(invalid());
        }

        position.set_turn(match &caps[9] {
            "b" => Color::Black,
            _ => Color::White,
        });

        let raw_rights = &caps[10];
        let mut rights = NO_CASTLE_RIGHTS;
        if raw_rights.contains('K') {
            rights |= WHITE_KINGSIDE_RIGHTS;
        }
        if raw_rights.contains('Q') {
            rights |= WHITE_QUEENSIDE_RIGHTS;
        }
        if raw_rights.contains('k') {
            rights |= BLACK_KINGSIDE_RIGHTS;
        }
        if raw_rights.contains('q') {
            rights |= BLACK_QUEENSIDE_RIGHTS;
        }
        position.set_castle_rights(rights);

        let raw_en_passant = &caps[11];
        if raw_en_passant != "-" {
            position.set_en_passant_target(Square::from_algebraic(raw_en_passant));
        }

        position.set_halfmove_clock(caps[12].parse().map_err(|_| invalid())?);
        position.set_fullmove_number(caps[13].parse().map_err(|_| invalid())?);

        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let mut fen_rows = vec![];
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty_run = 0;
            for file in 0..8 {
                match self.get(Square::from_file_rank(file, rank)) {
                    Some((piece, color)) => {
                        if empty_run > 0 {
                            row.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        row.push(piece.to_fen(color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }
            fen_rows.push(row);
        }

        let fen_turn = match self.turn() {
            Color::White => 'w',
            Color::Black => 'b',
        };

        let rights = self.castle_rights();
        let mut fen_rights = String::new();
        if rights & WHITE_KINGSIDE_RIGHTS > 0 {
            fen_rights.push('K');
        }
        if rights & WHITE_QUEENSIDE_RIGHTS > 0 {
            fen_rights.push('Q');
        }
        if rights & BLACK_KINGSIDE_RIGHTS > 0 {
            fen_rights.push('k');
        }
        if rights & BLACK_QUEENSIDE_RIGHTS > 0 {
            fen_rights.push('q');
        }
        if fen_rights.is_empty() {
            fen_rights.push('-');
        }

        let fen_en_passant = match self.en_passant_target() {
            Some(square) => square.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            fen_rows.join("/"),
            fen_turn,
            fen_rights,
            fen_en_passant,
            self.halfmove_clock(),
            self.fullmove_number(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::square::*;

    #[test]
    fn test_parse_fen() {
        let position = Position::from_fen("8/8/8/4p1K1/2k1P3/8/8/8 b - - 4 11").unwrap();
        println!("Testing position:\n{}", position);

        let expected_occupants = [
            (C4, Piece::King, Color::Black),
            (E5, Piece::Pawn, Color::Black),
            (E4, Piece::Pawn, Color::White),
            (G5, Piece::King, Color::White),
        ];
        for (square, piece, color) in expected_occupants {
            assert_eq!(Some((piece, color)), position.get(square));
        }
        assert_eq!(4, position.occupied().count_ones());

        assert_eq!(Color::Black, position.turn());
        assert_eq!(NO_CASTLE_RIGHTS, position.castle_rights());
        assert_eq!(None, position.en_passant_target());
        assert_eq!(4, position.halfmove_clock());
        assert_eq!(11, position.fullmove_number());
    }

    #[test]
    fn test_parse_fen_with_en_passant_and_rights() {
        let position =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        assert_eq!(Some(D6), position.en_passant_target());
        assert_eq!(
            WHITE_KINGSIDE_RIGHTS
                | WHITE_QUEENSIDE_RIGHTS
                | BLACK_KINGSIDE_RIGHTS
                | BLACK_QUEENSIDE_RIGHTS,
            position.castle_rights()
        );
    }

    #[test]
    fn test_parse_fen_rejects_garbage() {
        assert!(Position::from_fen("not a fen").is_err());
        assert!(Position::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        // rank with nine squares
        assert!(Position::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Position::from_fen("ppppppppp/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn test_parse_fen_rejects_pawns_on_back_ranks() {
        // an unpromoted pawn on either back rank is unreachable in play and
        // would break pawn move generation downstream
        assert!(Position::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/p3K3 w - - 0 1").is_err());
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/P3K3 w - - 0 1").is_err());
        assert!(Position::from_fen("p3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            "8/8/8/4p1K1/2k1P3/8/8/8 b - - 4 11",
            STARTING_POSITION_FEN,
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 12 34",
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
        ];
        for fen in fens {
            let position = Position::from_fen(fen).unwrap();
            assert_eq!(fen, position.to_fen());
        }
    }

    #[test]
    fn test_round_trip_yields_identical_position() {
        let original = Position::starting_position();
        let reimported = Position::from_fen(&original.to_fen()).unwrap();
        assert!(original == reimported);
        assert_eq!(STARTING_POSITION_FEN, original.to_fen());
    }
}
