use core::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bitboard::bitboard::Bitboard;

static ALGEBRAIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-hA-H][1-8]$").expect("ALGEBRAIC_RE regex should be valid"));

/// A single board coordinate, stored as an index 0..64 (file + 8 * rank).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Square(u8);

impl Square {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        Self(file + rank * 8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File 0..8, where 0 is the a-file.
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Rank 0..8, where 0 is rank 1.
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    pub const fn to_bitboard(self) -> Bitboard {
        Bitboard(1 << self.0)
    }

    /// Parses standard algebraic coordinates (`a1` through `h8`).
    pub fn from_algebraic(coord: &str) -> Option<Self> {
        if !ALGEBRAIC_RE.is_match(coord) {
            return None;
        }

        let mut chars = coord.chars();
        let file_char = chars.next()?.to_ascii_lowercase();
        let rank_char = chars.next()?;

        let file = file_char as u8 - b'a';
        let rank = rank_char as u8 - b'1';
        Some(Self::from_file_rank(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{}{}", file, rank)
    }
}

#[rustfmt::skip]
mod constants {
    use super::Square;

    pub const A1: Square = Square::new(0); pub const B1: Square = Square::new(1);
    pub const C1: Square = Square::new(2); pub const D1: Square = Square::new(3);
    pub const E1: Square = Square::new(4); pub const F1: Square = Square::new(5);
    pub const G1: Square = Square::new(6); pub const H1: Square = Square::new(7);

    pub const A2: Square = Square::new(8); pub const B2: Square = Square::new(9);
    pub const C2: Square = Square::new(10); pub const D2: Square = Square::new(11);
    pub const E2: Square = Square::new(12); pub const F2: Square = Square::new(13);
    pub const G2: Square = Square::new(14); pub const H2: Square = Square::new(15);

    pub const A3: Square = Square::new(16); pub const B3: Square = Square::new(17);
    pub const C3: Square = Square::new(18); pub const D3: Square = Square::new(19);
    pub const E3: Square = Square::new(20); pub const F3: Square = Square::new(21);
    pub const G3: Square = Square::new(22); pub const H3: Square = Square::new(23);

    pub const A4: Square = Square::new(24); pub const B4: Square = Square::new(25);
    pub const C4: Square = Square::new(26); pub const D4: Square = Square::new(27);
    pub const E4: Square = Square::new(28); pub const F4: Square = Square::new(29);
    pub const G4: Square = Square::new(30); pub const H4: Square = Square::new(31);

    pub const A5: Square = Square::new(32); pub const B5: Square = Square::new(33);
    pub const C5: Square = Square::new(34); pub const D5: Square = Square::new(35);
    pub const E5: Square = Square::new(36); pub const F5: Square = Square::new(37);
    pub const G5: Square = Square::new(38); pub const H5: Square = Square::new(39);

    pub const A6: Square = Square::new(40); pub const B6: Square = Square::new(41);
    pub const C6: Square = Square::new(42); pub const D6: Square = Square::new(43);
    pub const E6: Square = Square::new(44); pub const F6: Square = Square::new(45);
    pub const G6: Square = Square::new(46); pub const H6: Square = Square::new(47);

    pub const A7: Square = Square::new(48); pub const B7: Square = Square::new(49);
    pub const C7: Square = Square::new(50); pub const D7: Square = Square::new(51);
    pub const E7: Square = Square::new(52); pub const F7: Square = Square::new(53);
    pub const G7: Square = Square::new(54); pub const H7: Square = Square::new(55);

    pub const A8: Square = Square::new(56); pub const B8: Square = Square::new(57);
    pub const C8: Square = Square::new(58); pub const D8: Square = Square::new(59);
    pub const E8: Square = Square::new(60); pub const F8: Square = Square::new(61);
    pub const G8: Square = Square::new(62); pub const H8: Square = Square::new(63);
}

pub use constants::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_rank() {
        assert_eq!(A1, Square::from_file_rank(0, 0));
        assert_eq!(B2, Square::from_file_rank(1, 1));
        assert_eq!(E4, Square::from_file_rank(4, 3));
        assert_eq!(H8, Square::from_file_rank(7, 7));
    }

    #[test]
    fn test_from_algebraic() {
        assert_eq!(Some(A1), Square::from_algebraic("a1"));
        assert_eq!(Some(A1), Square::from_algebraic("A1"));
        assert_eq!(Some(E5), Square::from_algebraic("e5"));
        assert_eq!(None, Square::from_algebraic("i1"));
        assert_eq!(None, Square::from_algebraic("a9"));
        assert_eq!(None, Square::from_algebraic("e55"));
    }

    #[test]
    fn test_to_algebraic() {
        assert_eq!("a1", A1.to_string());
        assert_eq!("h8", H8.to_string());
        assert_eq!("e4", E4.to_string());
    }

    #[test]
    fn test_file_rank_round_trip() {
        for index in 0..64 {
            let square = Square::new(index);
            assert_eq!(square, Square::from_file_rank(square.file(), square.rank()));
        }
    }
}
